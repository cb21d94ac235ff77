use std::ffi::OsStr;

/// Renders a program and its arguments as a single shell-like line.
///
/// Only used for logs and diagnostics; the engine is never invoked through a
/// shell.
pub fn render_command_line<I, S>(program: impl AsRef<OsStr>, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    std::iter::once(format_shell_token(&program.as_ref().to_string_lossy()))
        .chain(args.into_iter().map(|arg| format_shell_token(&arg.as_ref().to_string_lossy())))
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_shell_token(token: &str) -> String {
    if !token.is_empty() && token.chars().all(|ch| !ch.is_whitespace() && ch != '"' && ch != '\\') {
        return token.to_string();
    }
    let escaped = token.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
