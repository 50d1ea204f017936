use chatbot_render::notice::CLIPBOARD_UNAVAILABLE;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Writes `text` to the system clipboard. The error is a readable reason.
pub async fn write_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window available".to_string())?;
    let navigator = window.navigator();

    // `navigator.clipboard` is undefined outside secure contexts, and calling
    // through it would throw past the wasm frame.
    let clipboard = js_sys::Reflect::get(&navigator, &"clipboard".into())
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .ok_or_else(|| CLIPBOARD_UNAVAILABLE.to_string())?
        .unchecked_into::<web_sys::Clipboard>();

    JsFuture::from(clipboard.write_text(text)).await.map(|_| ()).map_err(|e| {
        e.dyn_ref::<js_sys::Error>()
            .map(|err| String::from(err.message()))
            .or_else(|| e.as_string())
            .unwrap_or_else(|| "clipboard unavailable".to_string())
    })
}
