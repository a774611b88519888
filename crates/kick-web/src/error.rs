use wasm_bindgen::JsValue;

/// Startup failures. Anything after a successful `game_init` is non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// No global `window` (e.g. running in a worker).
    NoWindow,
    NoDocument,
    /// No element with the given id.
    MissingElement(String),
    /// The element exists but is not a `<canvas>`.
    NotACanvas(String),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::MissingElement(id) => write!(f, "no element with id '{id}'"),
            Self::NotACanvas(id) => write!(f, "element '{id}' is not a canvas"),
        }
    }
}

impl std::error::Error for InitError {}

impl From<InitError> for JsValue {
    fn from(err: InitError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        assert_eq!(
            InitError::MissingElement("stage".into()).to_string(),
            "no element with id 'stage'"
        );
        assert_eq!(
            InitError::NotACanvas("stage".into()).to_string(),
            "element 'stage' is not a canvas"
        );
        assert_eq!(InitError::NoWindow.to_string(), "no global window");
    }
}
