use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

#[cfg(target_os = "android")]
fn android_files_dir() -> Option<PathBuf> {
    use jni::{
        objects::{JObject, JString},
        JavaVM,
    };
    unsafe {
        let ctx = ndk_context::android_context();
        let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
        let mut env = vm.attach_current_thread().ok()?; // mutable for JNI calls
        let activity = JObject::from_raw(ctx.context().cast());
        let files_dir = env
            .call_method(activity, "getFilesDir", "()Ljava/io/File;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_obj = env
            .call_method(files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_jstring: JString = JString::from(abs_path_obj);
        let abs_path: String = env.get_string(&abs_path_jstring).ok()?.into();
        Some(PathBuf::from(abs_path))
    }
}

/// Get the app data directory for the current platform
pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        if let Some(dir) = android_files_dir() {
            return dir;
        }
        // Fallbacks
        for d in [
            "/data/user/0/dev.photolog.app/files",
            "/data/data/dev.photolog.app/files",
        ] {
            let p = PathBuf::from(d);
            if p.exists() {
                return p;
            }
        }
        PathBuf::from("./data")
    }

    #[cfg(not(target_os = "android"))]
    {
        // On desktop, use ./data directory
        PathBuf::from("./data")
    }
}

/// Permanent document storage. Picked images are copied here so cache
/// eviction of the picker's temporary file cannot orphan a selection.
pub fn documents_dir() -> PathBuf {
    app_data_dir().join("documents")
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Copy `src` into the documents directory under `file_name` and return the
/// permanent path.
pub fn copy_into_documents(src: &Path, file_name: &str) -> Result<PathBuf> {
    copy_into(&documents_dir(), src, file_name)
}

fn copy_into(dir: &Path, src: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dst = dir.join(file_name);
    fs::copy(src, &dst)?;
    Ok(dst)
}
