//! 与运行环境相关的小工具（时间戳、panic hook）。

/// 当前 Unix 毫秒时间戳。
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    web_sys::js_sys::Date::now() as u64
}

/// 当前 Unix 毫秒时间戳。
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
pub fn set_panic_hook() {}
