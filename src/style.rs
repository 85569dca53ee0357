use std::{
    fmt::Display,
    io::IsTerminal,
    sync::{Arc, LazyLock},
};

use anstyle::{AnsiColor, Style};

/// How output written to a particular stream should be styled.
///
/// A theme is unstyled when the stream isn't a terminal, or when colors have
/// been disabled via `NO_COLOR` or `TERM=dumb`.
#[derive(Clone, Debug)]
pub struct Theme {
    inner: Option<Arc<ThemeInner>>,
}

impl Theme {
    pub fn stdout() -> &'static Theme {
        static THEME: LazyLock<Theme> =
            LazyLock::new(|| Theme::detect(std::io::stdout().is_terminal()));
        &*THEME
    }

    pub fn stderr() -> &'static Theme {
        static THEME: LazyLock<Theme> =
            LazyLock::new(|| Theme::detect(std::io::stderr().is_terminal()));
        &*THEME
    }

    fn detect(tty: bool) -> Theme {
        if !tty || !can_use_colors() {
            return Theme { inner: None };
        }
        Theme { inner: Some(Arc::new(ThemeInner::default())) }
    }

    /// Used for timestamps in log messages.
    pub fn highlight<T: Display>(&self, data: T) -> Styled<'_, T> {
        Styled { data, style: self.inner.as_deref().map(|i| &i.highlight) }
    }

    /// Used for the paths of generated documents.
    pub fn path<T: Display>(&self, data: T) -> Styled<'_, T> {
        Styled { data, style: self.inner.as_deref().map(|i| &i.path) }
    }
}

#[derive(Debug)]
struct ThemeInner {
    highlight: Style,
    path: Style,
}

impl Default for ThemeInner {
    fn default() -> ThemeInner {
        ThemeInner {
            highlight: Style::new()
                .bold()
                .fg_color(Some(AnsiColor::Magenta.into())),
            path: Style::new().fg_color(Some(AnsiColor::Green.into())),
        }
    }
}

/// A possibly unstyled piece of renderable data.
#[derive(Clone, Debug)]
pub struct Styled<'s, T> {
    data: T,
    style: Option<&'s Style>,
}

impl<'s, T: Display> Display for Styled<'s, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Some(style) = self.style else {
            return self.data.fmt(f);
        };
        write!(f, "{style}{}{style:#}", self.data)
    }
}

fn can_use_colors() -> bool {
    static YES: LazyLock<bool> = LazyLock::new(|| {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return false;
        }
        std::env::var_os("TERM").map_or(true, |v| v != "dumb")
    });
    *YES
}
