//! Display command sequences.
//!
//! The controller never talks to the display directly. It produces
//! [`DisplayCommand`]s, built here from the display configuration, and the
//! control loop forwards them to the [`DisplayDevice`] in order.
//!
//! ```text
//! column  0123456789012345
//! row 0       Sala CPD          <- title, idle screen only
//! row 1   Senha: ***4           <- prompt + entry echo, or a status line
//! ```
//!
//! [`DisplayDevice`]: doorlock_hardware::DisplayDevice

use doorlock_core::{
    KeySymbol,
    config::DisplayConfig,
    constants::{ENTRY_ROW, TITLE_ROW},
};

/// One instruction for the display collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Blank the display.
    Clear,

    /// Move the cursor.
    SetCursor { column: usize, row: usize },

    /// Write text at the cursor.
    Print(String),
}

impl DisplayCommand {
    pub fn set_cursor(column: usize, row: usize) -> Self {
        Self::SetCursor { column, row }
    }

    pub fn print(text: impl Into<String>) -> Self {
        Self::Print(text.into())
    }
}

/// Where and how entered symbols are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoLayout {
    /// Column of the first symbol.
    pub column: usize,

    /// Row of the echo.
    pub row: usize,

    /// Character shown in place of earlier symbols.
    pub mask: char,
}

impl EchoLayout {
    /// Commands echoing the symbol stored at `index`.
    ///
    /// The previous position is masked first, so only the newest symbol is
    /// ever readable.
    ///
    /// ```
    /// use doorlock_controller::screen::{DisplayCommand, EchoLayout};
    /// use doorlock_core::KeySymbol;
    ///
    /// let echo = EchoLayout { column: 7, row: 1, mask: '*' };
    /// let key = KeySymbol::new('2').unwrap();
    ///
    /// assert_eq!(echo.commands(1, key), vec![
    ///     DisplayCommand::set_cursor(7, 1),
    ///     DisplayCommand::print("*"),
    ///     DisplayCommand::set_cursor(8, 1),
    ///     DisplayCommand::print("2"),
    /// ]);
    /// ```
    pub fn commands(&self, index: usize, symbol: KeySymbol) -> Vec<DisplayCommand> {
        let mut commands = Vec::with_capacity(4);
        if index > 0 {
            commands.push(DisplayCommand::set_cursor(
                self.column + index - 1,
                self.row,
            ));
            commands.push(DisplayCommand::print(self.mask));
        }
        commands.push(DisplayCommand::set_cursor(self.column + index, self.row));
        commands.push(DisplayCommand::print(symbol.as_char()));
        commands
    }
}

/// Builds every screen the controller shows.
#[derive(Debug, Clone)]
pub struct Screen {
    config: DisplayConfig,
}

impl Screen {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    /// Layout of the entry echo, shared by passcode entry and passcode change.
    pub fn echo_layout(&self) -> EchoLayout {
        EchoLayout {
            column: self.config.echo_column(),
            row: ENTRY_ROW,
            mask: self.config.mask,
        }
    }

    /// Title on row 0, prompt label on row 1.
    pub fn idle(&self) -> Vec<DisplayCommand> {
        vec![
            DisplayCommand::Clear,
            DisplayCommand::set_cursor(self.config.title_column, TITLE_ROW),
            DisplayCommand::print(&self.config.title),
            DisplayCommand::set_cursor(0, ENTRY_ROW),
            DisplayCommand::print(&self.config.prompt),
        ]
    }

    /// Replace the whole entry row with `text`.
    ///
    /// The text is padded to the display width so no echoed symbol survives
    /// next to a short message.
    pub fn status(&self, text: &str) -> Vec<DisplayCommand> {
        vec![
            DisplayCommand::set_cursor(0, ENTRY_ROW),
            DisplayCommand::print(format!("{text:<width$}", width = self.config.columns)),
        ]
    }

    pub fn granted(&self) -> Vec<DisplayCommand> {
        self.status(&self.config.granted)
    }

    pub fn denied(&self) -> Vec<DisplayCommand> {
        self.status(&self.config.denied)
    }

    pub fn admin_mode(&self) -> Vec<DisplayCommand> {
        self.status(&self.config.admin_mode)
    }

    /// Blank screen with the new passcode prompt on row 0.
    pub fn admin_prompt(&self) -> Vec<DisplayCommand> {
        self.headline(&self.config.new_passcode)
    }

    /// Blank screen with the passcode changed confirmation on row 0.
    pub fn passcode_changed(&self) -> Vec<DisplayCommand> {
        self.headline(&self.config.passcode_changed)
    }

    fn headline(&self, text: &str) -> Vec<DisplayCommand> {
        vec![
            DisplayCommand::Clear,
            DisplayCommand::set_cursor(0, TITLE_ROW),
            DisplayCommand::print(text),
        ]
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}
