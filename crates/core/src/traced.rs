// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing support for effects executed against the coordination service

/// Effects that carry a stable name and structured fields for log spans
pub trait TracedEffect {
    /// Span name (e.g., "create_node", "watch_node")
    fn name(&self) -> &'static str;

    /// Key-value pairs recorded on the span
    fn fields(&self) -> Vec<(&'static str, String)>;
}
