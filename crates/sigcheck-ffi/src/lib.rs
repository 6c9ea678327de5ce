//! C interface to sigcheck
//!
//! ```c
//! char *verifier_verify(const char *digest_hex, const char *bundle_path);
//! char *verifier_refresh(void);
//! void verifier_free_string(char *s);
//! ```
//!
//! Both calls return NULL on success and an error message otherwise. The
//! message is owned by the caller and must be released with
//! `verifier_free_string`.
//!
//! Settings come from the file named by `SIGCHECK_CONFIG`, if set, and the
//! trusted root from `SIGCHECK_TRUSTED_ROOT` or that file. They are read on
//! the first call; a failed first load is retried on the next call.

use sigcheck_verify::config::Settings;
use sigcheck_verify::VerifierContext;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::OnceLock;

static CONTEXT: OnceLock<VerifierContext> = OnceLock::new();

fn context() -> Result<&'static VerifierContext, String> {
    if let Some(context) = CONTEXT.get() {
        return Ok(context);
    }
    let settings = Settings::from_env().map_err(|e| e.to_string())?;
    let context = VerifierContext::from_settings(&settings).map_err(|e| e.to_string())?;
    tracing::debug!("verifier context initialized");
    Ok(CONTEXT.get_or_init(|| context))
}

/// Borrow a C string argument as UTF-8
///
/// # Safety
///
/// `ptr` must be NULL or point to a NUL-terminated string that outlives the call.
unsafe fn str_arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{name} must not be null"));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("{name} is not valid UTF-8"))
}

/// Hand an outcome to C: NULL for success, an owned message for failure
fn into_c_result(result: Result<(), String>) -> *mut c_char {
    match result {
        Ok(()) => ptr::null_mut(),
        Err(message) => {
            let message = message.replace('\0', " ");
            CString::new(message).map_or(ptr::null_mut(), CString::into_raw)
        }
    }
}

fn guarded(f: impl FnOnce() -> Result<(), String>) -> *mut c_char {
    let result = catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|_| Err("internal error: verification panicked".to_string()));
    into_c_result(result)
}

/// Verify the bundle at `bundle_path` for the artifact with digest `digest_hex`
///
/// Returns NULL when the bundle verifies, otherwise the error message.
///
/// # Safety
///
/// Both arguments must be NULL or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn verifier_verify(
    digest_hex: *const c_char,
    bundle_path: *const c_char,
) -> *mut c_char {
    guarded(|| {
        let digest_hex = str_arg(digest_hex, "digest")?;
        let bundle_path = str_arg(bundle_path, "bundle path")?;
        context()?
            .verify(digest_hex, bundle_path)
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

/// Reload the trusted root from its file
///
/// Returns NULL on success, otherwise the error message; the previous trust
/// material stays in use after a failure.
#[no_mangle]
pub extern "C" fn verifier_refresh() -> *mut c_char {
    guarded(|| context()?.refresh().map_err(|e| e.to_string()))
}

/// Release a string returned by this library
///
/// # Safety
///
/// `s` must be NULL or a pointer returned by this library that has not been
/// freed yet.
#[no_mangle]
pub unsafe extern "C" fn verifier_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
