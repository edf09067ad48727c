// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Initialisation of the `env_logger` backend of the `log` facade.
//!
//! The filter defaults to `info` and is overridden by `RUST_LOG`.

use env_logger::{Builder, Env};

fn builder() -> Builder {
    Builder::from_env(Env::default().default_filter_or("info"))
}

/// Installs the global logger.
///
/// # Panics
///
/// Panics if a logger was already installed; use [`try_init_logging`] where
/// that can happen, e.g. in tests.
pub fn init_logging() {
    builder().init();
}

/// Installs the global logger unless one is already installed.
///
/// Returns `false` if another logger was in place.
pub fn try_init_logging() -> bool {
    builder().is_test(cfg!(test)).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        try_init_logging();
        assert!(!try_init_logging());
        log::info!("logging is up");
    }
}
