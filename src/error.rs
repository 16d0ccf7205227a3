use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("maze dimensions must be odd and at least 5, got {cols}x{rows}")]
    InvalidMazeSize { cols: usize, rows: usize },
    #[error("settings store unavailable")]
    StoreUnavailable,
    #[error("settings store error: {0}")]
    Store(String),
    #[error("settings value could not be encoded or decoded: {source}")]
    Codec {
        #[from]
        source: serde_json::Error,
    },
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;

impl From<JsValue> for ArcadeError {
    fn from(value: JsValue) -> Self {
        ArcadeError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ArcadeError> for JsValue {
    fn from(err: ArcadeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_errors_carry_the_serde_message() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let detail = source.to_string();
        let err = ArcadeError::from(source);
        let text = err.to_string();
        assert!(text.starts_with("settings value could not be encoded or decoded: "));
        assert!(text.ends_with(&detail), "{text}");
    }

    #[test]
    fn missing_element_names_the_element() {
        let err = ArcadeError::MissingElement("chase game area".to_string());
        assert_eq!(err.to_string(), "missing element: chase game area");
    }
}
