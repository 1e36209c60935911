// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the ladder CLI.
//!
//! ```bash
//! ladder completions bash > ~/.local/share/bash-completion/completions/ladder
//! ladder completions zsh > ~/.zfunc/_ladder
//! ladder completions fish > ~/.config/fish/completions/ladder.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

pub const BIN_NAME: &str = "ladder";

/// Write completions for `shell` to `out`.
pub fn generate_completions<C: CommandFactory>(shell: Shell, out: &mut dyn Write) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Arguments for the completions command.
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
