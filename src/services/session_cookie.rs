// ============================================================================
// SESSION COOKIE - Leer la cookie de acceso para reconciliar la sesión
// ============================================================================

/// Buscar `name` en una cabecera estilo `document.cookie` ("a=1; b=2")
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Cookie del documento actual (None si es HttpOnly o no existe)
#[cfg(target_arch = "wasm32")]
pub fn read_cookie(name: &str) -> Option<String> {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlDocument;

    let document = web_sys::window()?.document()?;
    let header = document.dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
    find_cookie(&header, name)
}
