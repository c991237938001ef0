// Platform-specific image picker: camera capture and gallery selection.
//
// On Android the main activity launches the system camera or picker; the
// outcome is read back by polling its result statics. A closed-without-
// choosing picker is a distinct, silent outcome, not an error. Other
// platforms report PlatformNotSupported.

use std::path::PathBuf;

// Only the Android paths construct most of these.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum PickerError {
    PermissionDenied(String),
    /// The user closed the picker without choosing anything.
    Cancelled,
    Timeout(String),
    PlatformNotSupported(String),
    Other(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PickerError::Cancelled => write!(f, "Selection cancelled"),
            PickerError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            PickerError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
            PickerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

/// Options passed to the camera or gallery picker.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// JPEG quality, 0.0–1.0.
    pub quality: f32,
    /// Whether a captured photo is also written to the device gallery.
    pub save_to_gallery: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            quality: 0.8,
            save_to_gallery: false,
        }
    }
}

#[cfg(target_os = "android")]
mod android {
    use super::{PickerError, PickerOptions};
    use jni::objects::{JClass, JObject, JString, JValue};
    use ndk_context::android_context;
    use std::path::PathBuf;

    // Fully qualified class name in slash format, as generated for Dioxus apps.
    const MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

    const POLL_INTERVAL_MS: u64 = 100;
    const POLL_ROUNDS: u64 = 600; // 60 second timeout

    fn jni_err(e: jni::errors::Error) -> PickerError {
        PickerError::Other(e.to_string())
    }

    /// Resolve the live MainActivity instance and its class through the
    /// application class loader.
    fn activity_instance<'a>(
        env: &mut jni::JNIEnv<'a>,
    ) -> Result<(JObject<'a>, JClass<'a>), PickerError> {
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
            return Err(PickerError::Other(
                "MainActivity instance is null - Activity not initialized?".to_string(),
            ));
        }

        Ok((instance, cls))
    }

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

    /// Launch `method` on the activity and poll for path, cancellation, or
    /// error.
    fn launch_and_poll(
        method: &str,
        args: &[JValue],
        signature: &str,
    ) -> Result<PathBuf, PickerError> {
        let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
        let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(jni_err)?;
        let mut env = vm.attach_current_thread().map_err(jni_err)?;

        let (activity, cls) = activity_instance(&mut env)?;

        env.call_static_method(&cls, "clearPickerResult", "()V", &[])
            .map_err(jni_err)?;

        env.call_method(&activity, method, signature, args)
            .map_err(jni_err)?;

        for _ in 0..POLL_ROUNDS {
            std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));

            if let Some(path) = take_static_string(&mut env, &cls, "getLastPhotoPath") {
                return Ok(PathBuf::from(path));
            }

            if let Ok(result) = env.call_static_method(&cls, "isPickerCancelled", "()Z", &[]) {
                if result.z().unwrap_or(false) {
                    return Err(PickerError::Cancelled);
                }
            }

            if let Some(err) = take_static_string(&mut env, &cls, "getLastPickerError") {
                return Err(PickerError::Other(err));
            }
        }

        Err(PickerError::Timeout(
            "Picker timeout - no selection made".to_string(),
        ))
    }

    pub fn capture_photo(options: &PickerOptions) -> Result<PathBuf, PickerError> {
        launch_and_poll(
            "launchCamera",
            &[
                JValue::Float(options.quality),
                JValue::Bool(options.save_to_gallery as u8),
            ],
            "(FZ)V",
        )
    }

    pub fn pick_image(options: &PickerOptions) -> Result<PathBuf, PickerError> {
        launch_and_poll(
            "launchImagePicker",
            &[JValue::Float(options.quality)],
            "(F)V",
        )
    }

    /// Ask for camera access; resolves through the permission dialog.
    pub fn request_camera_permission() -> bool {
        let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
        let vm = match unsafe { jni::JavaVM::from_raw(vm_ptr) } {
            Ok(vm) => vm,
            Err(e) => {
                log::warn!("Camera permission request failed: {}", e);
                return false;
            }
        };
        let mut env = match vm.attach_current_thread() {
            Ok(env) => env,
            Err(e) => {
                log::warn!("Camera permission request failed: {}", e);
                return false;
            }
        };

        let (activity, cls) = match activity_instance(&mut env) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("Camera permission request failed: {}", e);
                return false;
            }
        };

        if let Err(e) = env.call_method(&activity, "requestCameraPermission", "()V", &[]) {
            log::warn!("requestCameraPermission failed: {}", e);
            return false;
        }

        // -1 pending, 0 denied, 1 granted
        for _ in 0..POLL_ROUNDS {
            std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));

            match env.call_static_method(&cls, "getCameraPermissionState", "()I", &[]) {
                Ok(result) => match result.i() {
                    Ok(1) => return true,
                    Ok(0) => return false,
                    _ => {}
                },
                Err(e) => {
                    log::warn!("getCameraPermissionState failed: {}", e);
                    return false;
                }
            }
        }

        false
    }
}

#[cfg(target_os = "android")]
pub fn capture_photo(options: &PickerOptions) -> Result<PathBuf, PickerError> {
    android::capture_photo(options)
}

#[cfg(target_os = "android")]
pub fn pick_image(options: &PickerOptions) -> Result<PathBuf, PickerError> {
    android::pick_image(options)
}

#[cfg(target_os = "android")]
pub fn request_camera_permission() -> bool {
    android::request_camera_permission()
}

// Non-Android implementations (stubs that return platform errors)
#[cfg(not(target_os = "android"))]
pub fn capture_photo(_options: &PickerOptions) -> Result<PathBuf, PickerError> {
    Err(PickerError::PlatformNotSupported(
        "Camera not available on this platform".to_string(),
    ))
}

#[cfg(not(target_os = "android"))]
pub fn pick_image(_options: &PickerOptions) -> Result<PathBuf, PickerError> {
    Err(PickerError::PlatformNotSupported(
        "Image picker not available on this platform".to_string(),
    ))
}

/// Platforms without a runtime permission model grant implicitly.
#[cfg(not(target_os = "android"))]
pub fn request_camera_permission() -> bool {
    true
}
