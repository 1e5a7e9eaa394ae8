//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens drawn from one shared view state:
//! - Form: gender, age, height, weight and report language
//! - Results: animated health score, BMI and recommendations

mod app;
mod presenter;
mod styles;
mod ui;

pub use app::App;
pub use presenter::{TuiPresenter, ViewState};
pub use styles::ReportTheme;
pub use ui::form::FormState;
