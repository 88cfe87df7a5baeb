// src/internal/logger/callsite.rs

use std::panic::Location;

/// Source location of the code that called into the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    function: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            function: None,
        }
    }

    /// Location of whoever called the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn function(&self) -> Option<&'static str> {
        self.function
    }
}

/// Keeps the part of `path` after the first occurrence of `marker`.
///
/// A missing or empty marker, or a path that does not contain it, leaves the
/// path untouched.
pub fn trim_to_project_root<'a>(path: &'a str, marker: Option<&str>) -> &'a str {
    match marker {
        Some(marker) if !marker.is_empty() => path
            .split_once(marker)
            .map(|(_, rest)| rest)
            .unwrap_or(path),
        _ => path,
    }
}

/// Captures file, line and enclosing function at the invocation site.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let function = name.strip_suffix("::__here").unwrap_or(name);
        $crate::internal::logger::CallSite::new(file!(), line!()).with_function(function)
    }};
}
