//! Results view: animated score, BMI and recommendations.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::ScoreFrame;
use crate::ports::ReportView;
use crate::tui::presenter::ViewState;
use crate::tui::styles::ReportTheme;

/// Render the results screen
pub fn render_results(f: &mut Frame, area: Rect, state: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Score
            Constraint::Length(4), // BMI
            Constraint::Min(0),    // Recommendations
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_results_header(f, chunks[0], state.results.as_ref());
    render_score(f, chunks[1], state.score);

    match &state.results {
        Some(view) => {
            render_bmi(f, chunks[2], view);
            render_recommendations(f, chunks[3], view, state.results_scroll);
        }
        None => {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "Waiting for report...",
                ReportTheme::text_muted(),
            )))
            .alignment(Alignment::Center);
            f.render_widget(waiting, chunks[3]);
        }
    }

    render_results_footer(f, chunks[4]);
}

fn render_results_header(f: &mut Frame, area: Rect, view: Option<&ReportView>) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("Health Report", ReportTheme::title()),
    ];
    if let Some(view) = view {
        spans.push(Span::styled(
            format!(" │ {}", view.generated_at.format("%d %b %Y %H:%M")),
            ReportTheme::text_secondary(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ReportTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_score(f: &mut Frame, area: Rect, frame: Option<ScoreFrame>) {
    let (ratio, label, style) = match frame {
        Some(frame) => (
            frame.fill_ratio(),
            format!("{} / 100", frame.displayed),
            ReportTheme::tier(frame.tier),
        ),
        None => (0.0, "0 / 100".to_string(), ReportTheme::text_muted()),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Health Score ", ReportTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(ReportTheme::border_focused()),
        )
        .gauge_style(style)
        .ratio(ratio)
        .label(Span::styled(label, ReportTheme::title()));

    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0)])
        .horizontal_margin(2)
        .split(area)[0];
    f.render_widget(gauge, area);
}

fn render_bmi(f: &mut Frame, area: Rect, view: &ReportView) {
    let tier_style = ReportTheme::tier(view.bmi_tier);

    let bmi = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("BMI: ", ReportTheme::text_secondary()),
            Span::styled(view.bmi.as_str(), tier_style),
        ]),
        Line::from(vec![
            Span::styled("Category: ", ReportTheme::text_secondary()),
            Span::styled(
                view.bmi_category.as_str(),
                tier_style.add_modifier(Modifier::ITALIC),
            ),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::NONE));

    f.render_widget(bmi, area);
}

fn render_recommendations(f: &mut Frame, area: Rect, view: &ReportView, scroll: u16) {
    let recommendations = Paragraph::new(Line::from(Span::styled(
        view.recommendations.as_str(),
        ReportTheme::text(),
    )))
    .wrap(Wrap { trim: true })
    .scroll((scroll, 0))
    .block(
        Block::default()
            .title(Span::styled(" Recommendations ", ReportTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ReportTheme::border()),
    );

    f.render_widget(recommendations, area);
}

fn render_results_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[N/Enter] ", ReportTheme::key_hint()),
        Span::styled("New Report ", ReportTheme::key_desc()),
        Span::styled("[↑↓] ", ReportTheme::key_hint()),
        Span::styled("Scroll ", ReportTheme::key_desc()),
        Span::styled("[Ctrl+E/G] ", ReportTheme::key_hint()),
        Span::styled("Language ", ReportTheme::key_desc()),
        Span::styled("[Q] ", ReportTheme::key_hint()),
        Span::styled("Quit", ReportTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ReportTheme::border()),
    );

    f.render_widget(footer, area);
}
