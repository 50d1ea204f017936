use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FileReader};

/// Reads `file` as a base64 data URL and hands the result to `on_done`.
/// `on_done` runs exactly once, including when the read cannot start.
pub fn read_as_data_url(file: &File, on_done: impl FnOnce(Result<String, String>) + 'static) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            on_done(Err(format!("{e:?}")));
            return;
        }
    };

    // The load events are queued as tasks, so the handler can be attached
    // after the read has started.
    if let Err(e) = reader.read_as_data_url(file) {
        log::error!("Failed to start reading {}: {e:?}", file.name());
        on_done(Err(format!("could not start reading {}", file.name())));
        return;
    }

    let reader_clone = reader.clone();
    let onloadend = Closure::once_into_js(move || {
        let result = reader_clone
            .result()
            .ok()
            .and_then(|value| value.as_string())
            .ok_or_else(|| "file could not be read".to_string());
        on_done(result);
    });
    reader.set_onloadend(Some(onloadend.unchecked_ref()));
}
