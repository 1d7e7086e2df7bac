mod quiz;
mod result;
mod setup;
mod status;

use std::time::Duration;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Screen};

pub fn render<C>(frame: &mut Frame, app: &App<C>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen() {
        Screen::Setup => setup::render(frame, area, app.form()),
        Screen::Loading => status::render_loading(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Error => status::render_error(frame, area, app.session()),
        Screen::Result => result::render(frame, area, app),
    }
}

/// Formats a duration as `mm:ss`.
fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "02:05");
        assert_eq!(format_elapsed(Duration::from_secs(6000)), "100:00");
    }
}
