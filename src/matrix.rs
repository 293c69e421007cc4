//! The build-variant matrix and operations over it.
//!
//! [`all_variants`] is the curated table, one entry per supported
//! compiler/OS/architecture combination. The remaining functions select,
//! lint and serialize a slice of variants; none of them reorder it.

use std::collections::HashSet;

use serde_json::Value;

use crate::document::{ConfigObject, Document};
use crate::mobile::{android, ios};
use crate::variant::{Expansions, TaskRef, Variant};

/// Key the orchestrator reads the variant list from.
pub const VARIANTS_KEY: &str = "buildvariants";

/// Batchtime for variants scheduled once a day.
pub const DAILY: u32 = 1440;

/// Batchtime for variants scheduled once a week.
pub const WEEKLY: u32 = 10080;

/// Problems found when selecting from or linting a variant list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// A requested variant name is not in the list.
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// Two or more variants share a name.
    #[error("duplicate variant name: {0}")]
    DuplicateName(String),

    /// A variant has no tasks to run.
    #[error("variant {0} has no tasks")]
    EmptyTasks(String),
}

/// Wrap serialized variants under [`VARIANTS_KEY`].
pub fn matrix_document<'a, I>(variants: I) -> Document
where
    I: IntoIterator<Item = &'a Variant>,
{
    let list = variants
        .into_iter()
        .map(|v| Value::Object(v.to_document()))
        .collect();
    let mut doc = Document::new();
    doc.insert(VARIANTS_KEY.to_owned(), Value::Array(list));
    doc
}

/// Pick the variants named in `names`, keeping table order.
///
/// An empty `names` selects every variant.
///
/// # Errors
///
/// Returns [`MatrixError::UnknownVariant`] for the first name not present.
pub fn select<'a>(
    variants: &'a [Variant],
    names: &[String],
) -> Result<Vec<&'a Variant>, MatrixError> {
    if names.is_empty() {
        return Ok(variants.iter().collect());
    }
    if let Some(missing) = names
        .iter()
        .find(|name| !variants.iter().any(|v| v.name() == name.as_str()))
    {
        return Err(MatrixError::UnknownVariant(missing.clone()));
    }
    Ok(variants
        .iter()
        .filter(|v| names.iter().any(|name| name.as_str() == v.name()))
        .collect())
}

/// Report duplicate names and empty task lists.
///
/// Each duplicated name is reported once. An empty result means the list is
/// safe to hand to the orchestrator.
pub fn lint(variants: &[Variant]) -> Vec<MatrixError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for variant in variants {
        let name = variant.name();
        if !seen.insert(name) && reported.insert(name) {
            problems.push(MatrixError::DuplicateName(name.to_owned()));
        }
        if variant.tasks().is_empty() {
            problems.push(MatrixError::EmptyTasks(name.to_owned()));
        }
    }
    problems
}

fn tasks(names: &[&str]) -> Vec<TaskRef> {
    names.iter().map(|name| TaskRef::from(*name)).collect()
}

fn cc(compiler: &str) -> Expansions {
    let mut expansions = Expansions::new();
    expansions.insert("CC".to_owned(), compiler.to_owned());
    expansions
}

fn cc_march(compiler: &str, march: &str) -> Expansions {
    let mut expansions = cc(compiler);
    expansions.insert("MARCH".to_owned(), march.to_owned());
    expansions
}

/// Every variant in the Evergreen matrix, in display order.
pub fn all_variants() -> Vec<Variant> {
    vec![
        Variant::new(
            "releng",
            "**Release Archive Creator",
            "ubuntu1604-test",
            vec![
                "make-release-archive".into(),
                "release-compile".into(),
                "debug-compile-nosasl-nossl".into(),
                ".debug-compile .stdflags".into(),
                ".debug-compile !.sspi .openssl".into(),
                ".debug-compile !.sspi .nossl".into(),
                "debug-compile-valgrind".into(),
                "debug-compile-no-counters".into(),
                "compile-tracing".into(),
                "debian-package-build".into(),
                TaskRef::on("rpm-package-build", &["rhel70"]),
                "link-with-cmake".into(),
                "abi-compliance-check".into(),
                "link-with-cmake-ssl".into(),
                "link-with-cmake-snappy".into(),
                TaskRef::on("link-with-cmake-mac", &["macos-1012"]),
                TaskRef::on("link-with-cmake-windows", &["windows-64-vs2015-compile"]),
                TaskRef::on("link-with-cmake-windows-ssl", &["windows-64-vs2015-compile"]),
                TaskRef::on("link-with-cmake-windows-snappy", &["windows-64-vs2015-compile"]),
                TaskRef::on("link-with-cmake-mingw", &["windows-64-vs2013-compile"]),
                TaskRef::on("link-with-pkg-config", &["ubuntu1604-test"]),
                TaskRef::on("link-with-pkg-config-mac", &["macos-1012"]),
                "link-with-pkg-config-ssl".into(),
                "link-with-bson".into(),
                TaskRef::on("link-with-bson-windows", &["windows-64-vs2015-compile"]),
                TaskRef::on("link-with-bson-mac", &["macos-1012"]),
                TaskRef::on("link-with-bson-mingw", &["windows-64-vs2013-compile"]),
                "check-public-headers".into(),
                "install-uninstall-check".into(),
                TaskRef::on("install-uninstall-check-mingw", &["windows-64-vs2015-compile"]),
                TaskRef::on("install-uninstall-check-msvc", &["windows-64-vs2015-compile"]),
            ],
        ),
        Variant::new(
            "clang34ubuntu",
            "clang 3.4 (Ubuntu 14.04)",
            "ubuntu1404-build",
            tasks(&[
                "debug-compile-scan-build",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-rdtscp",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".4.0 .openssl !.nosasl .server",
                ".3.6 .openssl !.nosasl .server",
                ".3.4 .openssl !.nosasl .server",
                ".3.2 .openssl !.nosasl .server",
                ".3.0 .openssl !.nosasl !.auth",
            ]),
        )
        .with_expansions(cc("clang")),
        Variant::new(
            "clang35",
            "clang 3.5 (Debian 8.1)",
            "debian81-test",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile .stdflags !.c89",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("clang")),
        Variant::new(
            "openssl",
            "OpenSSL / LibreSSL",
            "archlinux-build",
            tasks(&[
                "build-and-run-authentication-tests-openssl-0.9.8",
                "build-and-run-authentication-tests-openssl-1.0.0",
                "build-and-run-authentication-tests-openssl-1.0.1",
                "build-and-run-authentication-tests-openssl-1.0.2",
                "build-and-run-authentication-tests-openssl-1.1.0",
                "build-and-run-authentication-tests-openssl-1.0.1-fips",
                "build-and-run-authentication-tests-libressl-2.5",
            ]),
        ),
        Variant::new(
            "clang37",
            "clang 3.7 (Archlinux)",
            "archlinux-test",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile .stdflags !.c89",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .nossl",
                ".4.0 .nossl",
                ".3.6 .nossl",
                ".3.4 .nossl",
                ".3.2 .nossl",
                ".3.0 .nossl .nosasl !.auth",
            ]),
        )
        .with_expansions(cc("clang")),
        Variant::new(
            "clang38-i386",
            "clang 3.8 (i386) (Ubuntu 16.04)",
            "ubuntu1604-test",
            tasks(&[
                "debug-compile-scan-build",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile .stdflags !.c89",
                ".debug-compile !.sspi .nossl .nosasl",
                ".latest .nossl .nosasl",
                ".4.0 .nossl .nosasl",
                ".3.6 .nossl .nosasl",
            ]),
        )
        .with_expansions(cc_march("clang", "i386")),
        Variant::new(
            "clang38",
            "clang 3.8 (Ubuntu 16.04)",
            "ubuntu1604-test",
            tasks(&[
                ".compression",
                "debug-compile-scan-build",
                "debug-compile-asan-clang",
                "debug-compile-ubsan",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile .stdflags !.c89",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".authentication-tests .valgrind",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
                ".3.6 .openssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("clang")),
        Variant::new(
            "gcc46",
            "GCC 4.6 (Ubuntu 12.04)",
            "ubuntu1204-test",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-rdtscp",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".3.6 .openssl !.nosasl .server",
                ".3.4 .openssl !.nosasl .server",
                ".3.2 .openssl !.nosasl .server",
                ".3.0 .openssl !.nosasl !.auth",
            ]),
        )
        .with_expansions(cc("gcc")),
        Variant::new(
            "gcc48ubuntu",
            "GCC 4.8 (Ubuntu 14.04)",
            "ubuntu1404-build",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".latest .nossl !.ipv4-ipv6",
                ".4.0 .openssl !.nosasl .server",
                ".3.6 .openssl !.nosasl .server",
                ".3.4 .openssl !.nosasl .server",
                ".3.2 .openssl !.nosasl .server",
                ".3.0 .openssl !.nosasl !.auth",
                ".latest .openssl .nosasl .replica_set",
                ".latest .openssl !.nosasl .replica_set",
            ]),
        )
        .with_expansions(cc("gcc")),
        Variant::new(
            "gcc48rhel",
            "GCC 4.8 (RHEL 7.0)",
            "rhel70",
            tasks(&[
                ".hardened",
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
                ".3.6 .openssl !.nosasl .server",
                ".3.4 .openssl !.nosasl .server",
                ".3.2 .openssl !.nosasl .server",
                ".3.0 .openssl !.nosasl !.auth",
            ]),
        )
        .with_expansions(cc("gcc")),
        Variant::new(
            "gcc49",
            "GCC 4.9 (Debian 8.1)",
            "debian81-test",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("gcc")),
        Variant::new(
            "gcc54-i386",
            "GCC 5.4 (i386) (Ubuntu 16.04)",
            "ubuntu1604-test",
            tasks(&[
                "debug-compile-coverage",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile !.sspi .nossl .nosasl",
                ".latest .nossl .nosasl",
                ".4.0 .nossl .nosasl",
            ]),
        )
        .with_expansions(cc_march("gcc", "i386")),
        Variant::new(
            "gcc54",
            "GCC 5.4 (Ubuntu 16.04)",
            "ubuntu1604-test",
            tasks(&[
                ".compression",
                "debug-compile-asan-gcc",
                "debug-compile-coverage",
                "debug-compile-nosrv",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".authentication-tests .valgrind",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                "retry-true-3.4-replica-set",
                "retry-true-latest-server",
                ".4.0 .openssl !.nosasl .server",
                "test-dns-openssl",
                "test-dns-auth-openssl",
            ]),
        )
        .with_expansions(cc("gcc")),
        Variant::new(
            "darwin",
            "*Darwin, macOS (Apple LLVM)",
            "macos-1012",
            tasks(&[
                ".compression !.snappy",
                "debug-compile-coverage",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-rdtscp",
                "debug-compile-no-align",
                "debug-compile-nosrv",
                ".debug-compile .darwinssl",
                ".debug-compile !.sspi .nossl",
                ".debug-compile .clang",
                ".authentication-tests .darwinssl",
                ".latest .darwinssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .darwinssl !.nosasl .server",
                ".3.6 .darwinssl !.nosasl .server",
                ".3.4 .darwinssl !.nosasl .server",
                ".3.2 .darwinssl !.nosasl .server",
                ".3.2 .nossl",
                "test-dns-darwinssl",
                "test-dns-auth-darwinssl",
                "debug-compile-lto",
                "debug-compile-lto-thin",
            ]),
        )
        .with_expansions(cc("clang")),
        Variant::new(
            "windows-2015",
            "Windows (VS 2015)",
            "windows-64-vs2015-compile",
            tasks(&[
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                "debug-compile-nosrv",
                ".debug-compile .winssl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".debug-compile .sspi",
                ".authentication-tests .openssl !.sasl",
                ".authentication-tests .winssl",
                ".latest .winssl !.nosasl .server",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .winssl !.nosasl .server",
                ".3.6 .winssl !.nosasl .server",
                ".3.4 .winssl !.nosasl .server",
                ".3.2 .winssl !.nosasl .server",
                ".3.0 .nossl",
                "test-dns-winssl",
                "test-dns-auth-winssl",
            ]),
        )
        .with_expansions(cc("Visual Studio 14 2015 Win64")),
        Variant::new(
            "windows-2015-32",
            "Windows (i386) (VS 2015)",
            "windows-64-vs2015-compile",
            tasks(&[
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile .sspi !.openssl",
                ".debug-compile .winssl .nosasl",
                ".debug-compile !.sspi .nossl .nosasl",
                ".authentication-tests .winssl",
                ".latest .winssl .nosasl .server",
                ".latest .nossl .nosasl",
                ".latest .sspi",
                ".4.0 .winssl .nosasl .server",
            ]),
        )
        .with_expansions(cc("Visual Studio 14 2015")),
        Variant::new(
            "windows-2013",
            "Windows (VS 2013)",
            "windows-64-vs2013-compile",
            tasks(&[
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile .winssl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".debug-compile .sspi",
                ".authentication-tests .openssl !.sasl",
                ".authentication-tests .winssl",
                ".latest .winssl !.nosasl .server",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".latest .sspi",
                ".4.0 .winssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("Visual Studio 12 2013 Win64")),
        Variant::new(
            "windows-2013-32",
            "Windows (i386) (VS 2013)",
            "windows-64-vs2013-compile",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-rdtscp",
                ".debug-compile .sspi !.openssl",
                ".debug-compile .winssl .nosasl",
                ".debug-compile !.sspi .nossl .nosasl",
                ".authentication-tests .winssl",
                ".latest .winssl .nosasl .server",
                ".latest .nossl .nosasl",
                ".latest .sspi",
                ".4.0 .winssl .nosasl .server",
            ]),
        )
        .with_expansions(cc("Visual Studio 12 2013")),
        Variant::new(
            "windows-2010",
            "Windows (VS 2010)",
            "windows-64-vs2010-compile",
            tasks(&[
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-rdtscp",
                ".debug-compile .winssl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".debug-compile .sspi",
                ".authentication-tests .openssl !.sasl",
                ".authentication-tests .winssl",
                ".latest .winssl !.nosasl .server",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".latest .sspi",
                ".4.0 .winssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("Visual Studio 10 2010 Win64")),
        Variant::new(
            "windows-2010-32",
            "Windows (i386) (VS 2010)",
            "windows-64-vs2010-compile",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile .winssl .sspi",
                ".debug-compile .winssl .nosasl",
                ".debug-compile !.sspi .nossl .nosasl",
                ".debug-compile .nossl .sspi",
                ".authentication-tests .winssl",
                ".latest .winssl .nosasl .server",
                ".latest .nossl .nosasl",
                ".latest .sspi",
                ".4.0 .winssl .nosasl .server",
            ]),
        )
        .with_expansions(cc("Visual Studio 10 2010")),
        Variant::new(
            "mingw",
            "MinGW-W64",
            "windows-64-vs2013-compile",
            tasks(&[
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile .nossl .nosasl",
                ".debug-compile .winssl .sspi",
                ".latest .nossl .nosasl .server",
                ".latest .winssl .sspi .server",
            ]),
        )
        .with_expansions(cc("mingw")),
        Variant::new(
            "power8-rhel71",
            "*Power8 (ppc64le) (RHEL 7.1)",
            "rhel71-power8-build",
            tasks(&[
                ".compression !.snappy",
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl !.sasl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(DAILY),
        Variant::new(
            "power8-ubuntu1604",
            "Power8 (ppc64le) (Ubuntu 16.04)",
            "ubuntu1604-power8-test",
            tasks(&[
                "debug-compile-scan-build",
                "debug-compile-coverage",
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
                "test-dns-openssl",
            ]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(DAILY),
        Variant::new(
            "arm-ubuntu1604",
            "*ARM (aarch64) (Ubuntu 16.04)",
            "ubuntu1604-arm64-large",
            tasks(&[
                ".compression !.snappy",
                "debug-compile-scan-build",
                "debug-compile-coverage",
                "debug-compile-no-align",
                "release-compile",
                "debug-compile-nosasl-nossl",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
                "test-dns-openssl",
            ]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(DAILY),
        Variant::new(
            "zseries-rhel72",
            "*zSeries",
            "rhel72-zseries-test",
            tasks(&[
                "release-compile",
                "debug-compile-nosasl-nossl",
                "debug-compile-no-align",
                ".debug-compile !.sspi .openssl",
                ".debug-compile !.sspi .nossl",
                ".authentication-tests .openssl",
                ".latest .openssl !.nosasl .server",
                ".latest .nossl",
                ".4.0 .openssl !.nosasl .server",
            ]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(DAILY),
        Variant::new(
            "valgrind-ubuntu",
            "Valgrind Tests (Ubuntu 14.04)",
            "ubuntu1404-build",
            tasks(&[
                ".debug-compile !.sspi .openssl !.sasl",
                ".debug-compile !.sspi .nossl !.sasl",
                ".debug-compile .special .valgrind",
                ".test-valgrind",
            ]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(WEEKLY),
        Variant::new(
            "asan-ubuntu",
            "ASAN Tests (Ubuntu 14.04)",
            "ubuntu1404-test",
            tasks(&[
                ".debug-compile .asan-clang",
                ".test-asan",
            ]),
        )
        .with_expansions(cc("clang"))
        .with_batchtime(DAILY),
        Variant::new(
            "code-coverage-ubuntu",
            "Code Coverage Tests",
            "ubuntu1404-build",
            tasks(&[".test-coverage"]),
        )
        .with_expansions(cc("gcc"))
        .with_batchtime(DAILY),
        Variant::new(
            "ios-102-debug",
            "iOS 10.2 DEBUG",
            "macos-1012",
            tasks(&["compile-libmongocapi"]),
        )
        .with_expansions(ios("iphoneos"))
        .with_batchtime(DAILY),
        Variant::new(
            "ios-sim-102-debug",
            "iOS Simulator 10.2 DEBUG",
            "macos-1012",
            tasks(&["compile-libmongocapi"]),
        )
        .with_expansions(ios("iphonesimulator"))
        .with_batchtime(DAILY),
        Variant::new(
            "android-debug-arm64",
            "Android arm64 (Ubuntu 16.04)",
            "ubuntu1604-build",
            tasks(&["compile-libmongocapi"]),
        )
        .with_expansions(android("arm64-v8a"))
        .with_batchtime(DAILY),
        Variant::new(
            "android-debug-x86",
            "Android x86_64 (Ubuntu 16.04)",
            "ubuntu1604-build",
            tasks(&["compile-libmongocapi"]),
        )
        .with_expansions(android("x86_64"))
        .with_batchtime(DAILY),
    ]
}
