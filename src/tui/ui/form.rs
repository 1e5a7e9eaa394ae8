//! Health report input form.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Gender, Language, RawFormValues, SchoolInfo};
use crate::tui::presenter::ViewState;
use crate::tui::styles::ReportTheme;

/// Numeric form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            value: String::new(),
        }
    }
}

/// Input buffers of the form screen.
///
/// Slot 0 is the gender select; slots 1-3 are age, height and weight.
#[derive(Debug, Clone)]
pub struct FormState {
    pub gender: Option<Gender>,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            gender: None,
            fields: vec![
                FormField::new("Age", "years (1-100)"),
                FormField::new("Height", "cm (30-250)"),
                FormField::new("Weight", "kg (5-200)"),
            ],
            selected_field: 0,
        }
    }
}

impl FormState {
    const SLOTS: usize = 4;

    #[must_use]
    pub fn gender_selected(&self) -> bool {
        self.selected_field == 0
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Self::SLOTS;
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = Self::SLOTS - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the gender select forward or back. From "not selected" the first
    /// step lands on either end of the list.
    pub fn cycle_gender(&mut self, forward: bool) {
        let all = Gender::ALL;
        let next = match self.gender.and_then(|g| all.iter().position(|&x| x == g)) {
            None if forward => 0,
            None => all.len() - 1,
            Some(i) if forward => (i + 1) % all.len(),
            Some(i) => (i + all.len() - 1) % all.len(),
        };
        self.gender = Some(all[next]);
    }

    fn current_field(&mut self) -> Option<&mut FormField> {
        self.selected_field
            .checked_sub(1)
            .and_then(|i| self.fields.get_mut(i))
    }

    /// Add a character to the current numeric field. Only digits and `.`.
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' {
            if let Some(field) = self.current_field() {
                field.value.push(c);
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.current_field() {
            field.value.pop();
        } else {
            self.gender = None;
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.current_field() {
            field.value.zeroize();
        } else {
            self.gender = None;
        }
    }

    /// Wipe every buffer and return to the first slot.
    pub fn reset(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.gender = None;
        self.selected_field = 0;
    }

    /// Raw values exactly as a user typed them.
    #[must_use]
    pub fn to_raw_values(&self) -> RawFormValues {
        let value = |i: usize| {
            self.fields
                .get(i)
                .map(|f| f.value.clone())
                .unwrap_or_default()
        };
        RawFormValues {
            gender: self.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
            age: value(0),
            height: value(1),
            weight: value(2),
        }
    }

    /// Typical values for a primary school pupil.
    pub fn load_sample_data(&mut self) {
        self.gender = Some(Gender::Female);
        let sample = ["10", "138", "32"];
        for (field, val) in self.fields.iter_mut().zip(sample) {
            field.value = val.to_string();
        }
    }
}

/// Render the form screen
pub fn render_report_form(f: &mut Frame, area: Rect, state: &ViewState) {
    let banner_height = if state.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(3),             // Language toggle
            Constraint::Min(0),                // Fields
            Constraint::Length(banner_height), // Error banner
            Constraint::Length(3),             // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0], state.school.as_ref());
    render_language_toggle(f, chunks[1], state.language);
    render_form_fields(f, chunks[2], &state.form);
    if let Some(message) = &state.error {
        render_error_banner(f, chunks[3], message);
    }
    render_form_footer(f, chunks[4], state.loading);
}

fn render_form_header(f: &mut Frame, area: Rect, school: Option<&SchoolInfo>) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("Student Health Report", ReportTheme::title()),
    ];
    if let Some(school) = school {
        spans.push(Span::styled(
            format!(" │ {}", school.name),
            ReportTheme::subtitle(),
        ));
        let place: Vec<&str> = [school.taluka.as_str(), school.district.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !place.is_empty() {
            spans.push(Span::styled(
                format!(", {}", place.join(", ")),
                ReportTheme::text_secondary(),
            ));
        }
        if !school.dise_code.is_empty() {
            spans.push(Span::styled(
                format!(" │ DISE {}", school.dise_code),
                ReportTheme::text_muted(),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ReportTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_language_toggle(f: &mut Frame, area: Rect, active: Language) {
    let option = |language: Language| {
        let style = if language == active {
            ReportTheme::selected()
        } else {
            ReportTheme::text_secondary()
        };
        Span::styled(format!(" {} ", language.label()), style)
    };

    let toggle = Paragraph::new(Line::from(vec![
        Span::styled(" Report language: ", ReportTheme::text_secondary()),
        option(Language::English),
        Span::raw(" "),
        option(Language::Gujarati),
    ]))
    .block(Block::default().borders(Borders::NONE));

    f.render_widget(toggle, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, form: &FormState) {
    let field_height = 3;
    let constraints: Vec<Constraint> = (0..FormState::SLOTS)
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(2)
        .split(area);

    render_gender_select(f, chunks[0], form.gender, form.gender_selected());

    for (i, field) in form.fields.iter().enumerate() {
        let is_selected = form.selected_field == i + 1;

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, ReportTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), ReportTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", ReportTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(field_block(field.label, is_selected));

        f.render_widget(content, chunks[i + 1]);
    }
}

fn render_gender_select(f: &mut Frame, area: Rect, gender: Option<Gender>, is_selected: bool) {
    let mut spans = vec![Span::raw(" ")];
    if is_selected {
        spans.push(Span::styled("◀ ", ReportTheme::cursor()));
    }
    for option in Gender::ALL {
        let style = if Some(option) == gender {
            ReportTheme::selected()
        } else {
            ReportTheme::text_muted()
        };
        spans.push(Span::styled(format!(" {} ", option.label()), style));
        spans.push(Span::raw(" "));
    }
    if is_selected {
        spans.push(Span::styled("▶", ReportTheme::cursor()));
    }

    let content = Paragraph::new(Line::from(spans)).block(field_block("Gender", is_selected));
    f.render_widget(content, area);
}

fn field_block(label: &str, is_selected: bool) -> Block<'_> {
    let (border_style, title_style) = if is_selected {
        (ReportTheme::border_focused(), ReportTheme::focused())
    } else {
        (ReportTheme::border(), ReportTheme::text_secondary())
    };

    Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_error_banner(f: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" ! ", ReportTheme::error_banner()),
        Span::styled(format!(" {message}"), ReportTheme::danger()),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ReportTheme::danger()),
    );

    f.render_widget(banner, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, loading: bool) {
    let content = if loading {
        Line::from(vec![Span::styled(
            "Generating report...",
            ReportTheme::focused(),
        )])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ReportTheme::key_hint()),
            Span::styled("Navigate ", ReportTheme::key_desc()),
            Span::styled("[←→] ", ReportTheme::key_hint()),
            Span::styled("Gender ", ReportTheme::key_desc()),
            Span::styled("[Enter] ", ReportTheme::key_hint()),
            Span::styled("Generate Report ", ReportTheme::key_desc()),
            Span::styled("[Ctrl+E/G] ", ReportTheme::key_hint()),
            Span::styled("Language ", ReportTheme::key_desc()),
            Span::styled("[S] ", ReportTheme::key_hint()),
            Span::styled("Sample Data ", ReportTheme::key_desc()),
            Span::styled("[Ctrl+Q] ", ReportTheme::key_hint()),
            Span::styled("Quit", ReportTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ReportTheme::border()),
    );

    f.render_widget(footer, area);
}
