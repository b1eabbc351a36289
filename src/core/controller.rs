/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// `+` or `=`
    ZoomIn,
    /// `-`
    ZoomOut,
}

/// Input the render loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / application quit request
    Quit,
    /// A key was pressed (auto-repeat included)
    KeyDown(Button),
}

impl Button {
    /// Map a logical key's text to a button
    pub fn from_key_text(text: &str) -> Option<Button> {
        match text {
            "+" | "=" => Some(Button::ZoomIn),
            "-" => Some(Button::ZoomOut),
            _ => None,
        }
    }
}
