// Platform-specific geolocation provider.
//
// On Android the main activity owns the actual provider calls; this module
// launches a request over JNI and polls the activity's result statics, the
// same round trip the image picker uses. Other platforms report
// PlatformNotSupported instead of pretending to have a fix.

use crate::error::LocationError;
use crate::models::{FixOptions, Location};

#[cfg(target_os = "android")]
use jni::objects::{JClass, JObject, JString, JValue};

#[cfg(target_os = "android")]
use ndk_context::android_context;

// Fully qualified class name in slash format, as generated for Dioxus apps.
#[cfg(target_os = "android")]
const MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

#[cfg(target_os = "android")]
const POLL_INTERVAL_MS: u64 = 100;

#[cfg(target_os = "android")]
fn jni_err(e: jni::errors::Error) -> LocationError {
    LocationError::Provider(e.to_string())
}

/// Resolve the live MainActivity instance and its class.
///
/// `find_class` cannot see app classes from a native thread, so the lookup
/// goes through the application class loader.
#[cfg(target_os = "android")]
fn activity_instance<'a>(
    env: &mut jni::JNIEnv<'a>,
) -> Result<(JObject<'a>, JClass<'a>), LocationError> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(jni_err)?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .map_err(jni_err)?
        .l()
        .map_err(jni_err)?;
    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .map_err(jni_err)?
        .l()
        .map_err(jni_err)?;
    let loader = env
        .call_method(&app, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .map_err(jni_err)?
        .l()
        .map_err(jni_err)?;

    let fq_dot = MAIN_ACTIVITY_CLASS.replace('/', ".");
    let name: JString = env.new_string(fq_dot).map_err(jni_err)?;
    let cls_obj = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&JObject::from(name))],
        )
        .map_err(jni_err)?
        .l()
        .map_err(jni_err)?;
    let cls = JClass::from(cls_obj);

    let signature = format!("()L{};", MAIN_ACTIVITY_CLASS);
    let instance = env
        .call_static_method(&cls, "getInstance", &signature, &[])
        .map_err(jni_err)?
        .l()
        .map_err(jni_err)?;

    if instance.is_null() {
        return Err(LocationError::Provider(
            "MainActivity instance is null - Activity not initialized?".to_string(),
        ));
    }

    Ok((instance, cls))
}

/// Read-and-clear a static String result; `None` while unset.
#[cfg(target_os = "android")]
fn take_static_string(
    env: &mut jni::JNIEnv,
    cls: &JClass,
    method: &str,
) -> Option<String> {
    let obj = env
        .call_static_method(cls, method, "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    if obj.is_null() {
        return None;
    }
    let s: String = env.get_string(&JString::from(obj)).ok()?.into();
    Some(s)
}

/// Ask for foreground location access.
///
/// Never fails: any platform error is logged and reported as not granted.
#[cfg(target_os = "android")]
pub fn request_permissions() -> bool {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    let vm = match unsafe { jni::JavaVM::from_raw(vm_ptr) } {
        Ok(vm) => vm,
        Err(e) => {
            log::warn!("Location permission request failed: {}", e);
            return false;
        }
    };
    let mut env = match vm.attach_current_thread() {
        Ok(env) => env,
        Err(e) => {
            log::warn!("Location permission request failed: {}", e);
            return false;
        }
    };

    let (activity, cls) = match activity_instance(&mut env) {
        Ok(pair) => pair,
        Err(e) => {
            log::warn!("Location permission request failed: {}", e);
            return false;
        }
    };

    if let Err(e) = env.call_method(&activity, "requestLocationPermission", "()V", &[]) {
        log::warn!("requestLocationPermission failed: {}", e);
        return false;
    }

    // The permission dialog resolves asynchronously; poll the cached state
    // (-1 pending, 0 denied, 1 granted). 60 second timeout.
    for _ in 0..600 {
        std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));

        match env.call_static_method(&cls, "getLocationPermissionState", "()I", &[]) {
            Ok(result) => match result.i() {
                Ok(1) => return true,
                Ok(0) => return false,
                _ => {}
            },
            Err(e) => {
                log::warn!("getLocationPermissionState failed: {}", e);
                return false;
            }
        }
    }

    false
}

/// Request one position fix.
///
/// High-accuracy mode, the configured timeout, and acceptance of cached
/// fixes up to `max_age_ms` old are forwarded to the platform provider.
#[cfg(target_os = "android")]
pub fn current_location(options: &FixOptions) -> Result<Location, LocationError> {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(jni_err)?;
    let mut env = vm.attach_current_thread().map_err(jni_err)?;

    let (activity, cls) = activity_instance(&mut env)?;

    env.call_static_method(&cls, "clearLastFix", "()V", &[])
        .map_err(jni_err)?;

    env.call_method(
        &activity,
        "requestLocationFix",
        "(ZJJ)V",
        &[
            JValue::Bool(options.high_accuracy as u8),
            JValue::Long(options.timeout_ms as i64),
            JValue::Long(options.max_age_ms as i64),
        ],
    )
    .map_err(jni_err)?;

    let rounds = options.timeout_ms / POLL_INTERVAL_MS + 1;
    for _ in 0..rounds {
        std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));

        if let Some(json) = take_static_string(&mut env, &cls, "getLastFixJson") {
            return parse_fix(&json);
        }

        if let Some(err) = take_static_string(&mut env, &cls, "getLastFixError") {
            return Err(LocationError::Provider(err));
        }
    }

    Err(LocationError::Timeout(
        "No position fix within the allotted time".to_string(),
    ))
}

/// Parse the provider's fix payload.
pub fn parse_fix(json: &str) -> Result<Location, LocationError> {
    serde_json::from_str(json)
        .map_err(|e| LocationError::Provider(format!("Malformed fix payload: {}", e)))
}

// Non-Android implementations (stubs that return platform errors)
#[cfg(not(target_os = "android"))]
pub fn request_permissions() -> bool {
    log::debug!("Location permissions not available on this platform");
    false
}

#[cfg(not(target_os = "android"))]
pub fn current_location(_options: &FixOptions) -> Result<Location, LocationError> {
    Err(LocationError::PlatformNotSupported(
        "Geolocation not available on this platform".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fix() {
        let fix = parse_fix(
            r#"{"latitude": 48.1351, "longitude": 11.5820, "accuracy": 12.5, "timestamp": 1722855600000}"#,
        )
        .unwrap();
        assert_eq!(fix.latitude, 48.1351);
        assert_eq!(fix.longitude, 11.5820);
        assert_eq!(fix.accuracy, Some(12.5));
        assert_eq!(fix.timestamp, Some(1722855600000));
    }

    #[test]
    fn test_parse_fix_without_optional_fields() {
        let fix = parse_fix(r#"{"latitude": -33.9, "longitude": 151.2}"#).unwrap();
        assert_eq!(fix.accuracy, None);
        assert_eq!(fix.timestamp, None);
    }

    #[test]
    fn test_parse_fix_rejects_garbage() {
        assert!(parse_fix("not json").is_err());
    }
}
