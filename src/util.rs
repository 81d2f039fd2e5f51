use std::fmt::Display;

pub trait ResultExt<T, E> {
    /// Render the error with `Display` and wrap it with `f`, used to turn
    /// tag and codec errors into [`crate::error::NfcError::Io`]
    fn map_err_str<Wrapped, F>(self, f: F) -> Result<T, Wrapped>
    where
        E: Display,
        F: FnOnce(String) -> Wrapped;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_err_str<Wrapped, F>(self, f: F) -> Result<T, Wrapped>
    where
        E: Display,
        F: FnOnce(String) -> Wrapped,
    {
        self.map_err(|e| f(e.to_string()))
    }
}
