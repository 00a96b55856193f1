//! WebAssembly bindings for Rowt

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::prelude::*;
use rowt_core::{build_app_url, parse_deep_link as parse_link, ParsedDeepLink};

static DEBUG: AtomicBool = AtomicBool::new(false);

fn debug_log(message: &str) {
    if DEBUG.load(Ordering::Relaxed) {
        web_sys::console::log_1(&JsValue::from_str(&format!("[Rowt SDK] {message}")));
    }
}

/// Turn console logging of parse and build calls on or off.
#[wasm_bindgen]
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
    debug_log("debug logging enabled");
}

#[wasm_bindgen]
pub fn parse_deep_link(url: &str) -> Result<JsValue, JsValue> {
    let link = parse_link(url).map_err(|e| {
        debug_log(&format!("failed to parse {url}: {e}"));
        JsValue::from_str(&e.to_string())
    })?;
    debug_log(&format!("parsed deep link {url}"));
    Ok(link_to_js(&link))
}

#[wasm_bindgen]
pub fn create_deep_link(prefix: &str, path: &str, params: JsValue) -> Result<String, JsValue> {
    if prefix.trim().is_empty() {
        return Err(JsValue::from_str("App URL prefix is required"));
    }
    let params = params_from_js(&params)?;
    let url = build_app_url(prefix, path, &params);
    debug_log(&format!("created deep link {url}"));
    Ok(url)
}

#[wasm_bindgen]
pub fn shortcode_from_shortlink(shortlink: &str) -> String {
    rowt_link::shortcode_from_shortlink(shortlink).to_string()
}

#[wasm_bindgen]
pub fn normalize_server_url(server_url: &str) -> String {
    rowt_link::normalize_server_url(server_url)
}

fn link_to_js(link: &ParsedDeepLink) -> JsValue {
    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&result, &"scheme".into(), &JsValue::from_str(&link.scheme));
    let _ = js_sys::Reflect::set(&result, &"host".into(), &JsValue::from_str(&link.host));
    let _ = js_sys::Reflect::set(&result, &"path".into(), &JsValue::from_str(&link.path));

    let segments = js_sys::Array::new_with_length(link.segments.len() as u32);
    for (i, segment) in link.segments.iter().enumerate() {
        segments.set(i as u32, JsValue::from_str(segment));
    }
    let _ = js_sys::Reflect::set(&result, &"segments".into(), &segments);

    let params = js_sys::Object::new();
    for (key, value) in &link.params {
        let _ = js_sys::Reflect::set(&params, &JsValue::from_str(key), &JsValue::from_str(value));
    }
    let _ = js_sys::Reflect::set(&result, &"params".into(), &params);
    let _ = js_sys::Reflect::set(&result, &"originalUrl".into(), &JsValue::from_str(&link.original_url));

    result.into()
}

fn params_from_js(params: &JsValue) -> Result<BTreeMap<String, String>, JsValue> {
    let mut map = BTreeMap::new();
    if params.is_undefined() || params.is_null() {
        return Ok(map);
    }

    let object = js_sys::Object::try_from(params)
        .ok_or_else(|| JsValue::from_str("Query params must be an object"))?;

    for entry in js_sys::Object::entries(object).iter() {
        let pair = js_sys::Array::from(&entry);
        let key = pair
            .get(0)
            .as_string()
            .ok_or_else(|| JsValue::from_str("Query param keys must be strings"))?;
        let value = pair.get(1);
        let value = if let Some(s) = value.as_string() {
            s
        } else if let Some(n) = value.as_f64() {
            n.to_string()
        } else if let Some(b) = value.as_bool() {
            b.to_string()
        } else {
            return Err(JsValue::from_str(&format!("Query param '{key}' must be a string, number or boolean")));
        };
        map.insert(key, value);
    }

    Ok(map)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn get(obj: &JsValue, key: &str) -> JsValue {
        js_sys::Reflect::get(obj, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn parses_into_plain_object() {
        let link = parse_deep_link("rowtapp://open/profile/42?ref=abc").unwrap();
        assert_eq!(get(&link, "host").as_string().as_deref(), Some("open"));
        assert_eq!(get(&link, "path").as_string().as_deref(), Some("/profile/42"));
        assert_eq!(js_sys::Array::from(&get(&link, "segments")).length(), 2);
        assert_eq!(get(&get(&link, "params"), "ref").as_string().as_deref(), Some("abc"));
    }

    #[wasm_bindgen_test]
    fn rejects_bad_links() {
        assert!(parse_deep_link("bad-url").is_err());
    }

    #[wasm_bindgen_test]
    fn builds_deep_links_from_objects() {
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &"id".into(), &JsValue::from(42)).unwrap();
        js_sys::Reflect::set(&params, &"ref".into(), &"mail".into()).unwrap();
        let url = create_deep_link("myapp://", "/item", params.into()).unwrap();
        assert_eq!(url, "myapp://item?id=42&ref=mail");

        assert!(create_deep_link("", "item", JsValue::UNDEFINED).is_err());
        assert!(create_deep_link("myapp://", "item", JsValue::from(3)).is_err());
    }

    #[wasm_bindgen_test]
    fn derives_shortcodes() {
        assert_eq!(shortcode_from_shortlink("https://rowt.app/abcde"), "abcde");
        assert_eq!(normalize_server_url("rowt.app"), "http://rowt.app");
    }
}
