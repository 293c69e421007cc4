//! CMake flag and toolchain-setup expansions for mobile cross-compilation.
//!
//! [`ios`] and [`android`] each return a two-entry [`Expansions`] map: the
//! CMake flags under [`CMAKE_FLAGS`] plus either the Xcode environment
//! ([`COMPILE_ENV`]) or the Android toolchain setup command
//! ([`SETUP_ANDROID_TOOLCHAIN`]). Paths and versions are the ones installed
//! on the Evergreen build hosts and are not checked here.

use crate::variant::Expansions;

/// Expansion holding the CMake flags for the mobile build.
pub const CMAKE_FLAGS: &str = "libmongocapi_cmake_flags";

/// Expansion holding the environment prefix for iOS compiles.
pub const COMPILE_ENV: &str = "libmongocapi_compile_env";

/// Expansion holding the Android toolchain setup command.
pub const SETUP_ANDROID_TOOLCHAIN: &str = "setup_android_toolchain";

/// iOS SDK that targets physical devices; every other SDK builds x86_64.
pub const IOS_DEVICE_SDK: &str = "iphoneos";

const IOS_MIN_VERSION: &str = "10.2";
const XCODE_DEVELOPER_DIR: &str = "DEVELOPER_DIR=/Applications/Xcode9.2.app";

const ANDROID_API_LEVEL: u32 = 21;
const ANDROID_TOOLCHAIN_FILE: &str = "./android_sdk/ndk-bundle/build/cmake/android.toolchain.cmake";
const ANDROID_JAVA_HOME: &str = "/opt/java/jdk8/";

/// Find-root-path modes shared by both mobile families.
///
/// Leading space included; the string is concatenated as-is.
pub const MOBILE_FLAGS: &str = concat!(
    " -DCMAKE_FIND_ROOT_PATH_MODE_LIBRARY=ONLY",
    " -DCMAKE_FIND_ROOT_PATH_MODE_PACKAGE=ONLY",
    " -DCMAKE_FIND_ROOT_PATH_MODE_PROGRAM=NEVER",
    " -DCMAKE_FIND_ROOT_PATH_MODE_INCLUDE=ONLY",
);

/// Expansions for an iOS build against `sdk` (`iphoneos` or `iphonesimulator`).
///
/// The SDK root is a `$(xcrun ...)` substitution left for the host shell.
pub fn ios(sdk: &str) -> Expansions {
    let arch = if sdk == IOS_DEVICE_SDK { "arm64" } else { "x86_64" };
    let root = format!("$(xcrun --sdk {sdk} --show-sdk-path)");
    let cflags = format!("-arch {arch} -isysroot {root} -miphoneos-version-min={IOS_MIN_VERSION}");
    let flags = format!(
        "{MOBILE_FLAGS} -DCMAKE_SYSTEM_NAME=Darwin \
         -DCMAKE_FIND_ROOT_PATH=\"{root}\" \
         -DCMAKE_INSTALL_NAME_DIR=@rpath \
         -DCMAKE_C_FLAGS=\"{cflags}\""
    );

    let mut expansions = Expansions::new();
    expansions.insert(CMAKE_FLAGS.to_owned(), flags);
    expansions.insert(COMPILE_ENV.to_owned(), XCODE_DEVELOPER_DIR.to_owned());
    expansions
}

/// Expansions for an Android NDK build for `abi` (e.g. `arm64-v8a`, `x86_64`).
pub fn android(abi: &str) -> Expansions {
    let flags = format!(
        "{MOBILE_FLAGS} -DANDROID_NATIVE_API_LEVEL={ANDROID_API_LEVEL} \
         -DANDROID_ABI={abi} \
         -DTHREADS_PTHREAD_ARG=2 \
         -DCMAKE_TOOLCHAIN_FILE={ANDROID_TOOLCHAIN_FILE} \
         -DCMAKE_FIND_ROOT_PATH=\"./android_toolchain\" \
         -DCMAKE_INSTALL_RPATH=\\$ORIGIN/../lib"
    );
    let setup = format!(
        "JAVA_HOME={ANDROID_JAVA_HOME} ./.evergreen/setup-android-toolchain.sh {abi} {}",
        toolchain_arch(abi)
    );

    let mut expansions = Expansions::new();
    expansions.insert(CMAKE_FLAGS.to_owned(), flags);
    expansions.insert(SETUP_ANDROID_TOOLCHAIN.to_owned(), setup);
    expansions
}

/// Standalone-toolchain architecture name for an Android ABI.
pub fn toolchain_arch(abi: &str) -> &str {
    match abi {
        "arm64-v8a" => "arm64",
        other => other,
    }
}
