use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub accent: Color,
    pub selected: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            border: Color::Rgb(70, 80, 90),
            accent: Color::Rgb(80, 160, 160),
            selected: Color::Rgb(30, 50, 60),
            positive: Color::Rgb(110, 190, 110),
            warning: Color::Rgb(220, 170, 70),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
