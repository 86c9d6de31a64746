use wasm_bindgen::JsValue;

/// Result alias for the browser glue and parsing helpers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the browser glue and the string-keyed JS API.
/// The game state machine itself has no failure paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("game board not mounted; call start_game() first")]
    NotMounted,
    /// A DOM / Web API call threw.
    #[error("js: {0}")]
    Js(String),
    #[cfg(feature = "serde_json")]
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
