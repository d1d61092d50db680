//! crates/logging/src/colors.rs
//! Per-level text decorators.

use std::fmt;
use std::rc::Rc;

use anstyle::{AnsiColor, Color, Style};

use crate::level::Level;

/// Pure text decoration applied to one part of a rendered line.
pub type Decorator = Rc<dyn Fn(&str) -> String>;

/// Wraps a closure as a [`Decorator`].
pub fn decorator<F>(f: F) -> Decorator
where
    F: Fn(&str) -> String + 'static,
{
    Rc::new(f)
}

/// Decorator that wraps text in the ANSI sequences of `style`.
pub fn style_decorator(style: Style) -> Decorator {
    decorator(move |text| format!("{}{}{}", style.render(), text, style.render_reset()))
}

/// Decorator that returns text unchanged.
pub fn plain_decorator() -> Decorator {
    decorator(str::to_owned)
}

/// Style used by [`ColorTable::default`] for `level`.
#[must_use]
pub const fn default_style(level: Level) -> Style {
    match level {
        Level::Trace => Style::new().dimmed(),
        Level::Debug => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))),
        Level::Info => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
        Level::Warn => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        Level::Current => Style::new()
            .fg_color(Some(Color::Ansi(AnsiColor::Magenta)))
            .bold(),
        Level::Error => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))),
        Level::Fatal => Style::new()
            .fg_color(Some(Color::Ansi(AnsiColor::White)))
            .bg_color(Some(Color::Ansi(AnsiColor::Red)))
            .bold(),
    }
}

/// Decorator per [`Level`].
///
/// Every level always has a decorator; overrides replace individual entries
/// and leave the rest alone.
///
/// # Examples
///
/// ```
/// use logging::{ColorTable, Level, decorator};
///
/// let mut table = ColorTable::plain();
/// table.set_level_colors([(Level::Warn, decorator(|text| format!("!{text}!")))]);
///
/// assert_eq!(table.decorate(Level::Warn, "careful"), "!careful!");
/// assert_eq!(table.decorate(Level::Info, "fine"), "fine");
/// ```
#[derive(Clone)]
pub struct ColorTable {
    decorators: [Decorator; 7],
}

impl ColorTable {
    /// Table that leaves every level undecorated.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            decorators: Level::ALL.map(|_| plain_decorator()),
        }
    }

    /// Decorates `text` with the entry for `level`.
    pub fn decorate(&self, level: Level, text: &str) -> String {
        (self.decorators[level.ordinal()])(text)
    }

    /// Returns the decorator registered for `level`.
    #[must_use]
    pub fn get(&self, level: Level) -> &Decorator {
        &self.decorators[level.ordinal()]
    }

    /// Replaces the decorator of one level.
    pub fn set(&mut self, level: Level, decorator: Decorator) {
        self.decorators[level.ordinal()] = decorator;
    }

    /// Merges a partial override; levels not mentioned keep their decorator.
    pub fn set_level_colors<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (Level, Decorator)>,
    {
        for (level, decorator) in overrides {
            self.set(level, decorator);
        }
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            decorators: Level::ALL.map(|level| style_decorator(default_style(level))),
        }
    }
}

impl fmt::Debug for ColorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorTable").finish_non_exhaustive()
    }
}
