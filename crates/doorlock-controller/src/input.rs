//! Keypad entry capture.
//!
//! [`InputCollector`] turns individual keypresses into a complete
//! [`Credential`]-sized entry, producing the masked echo as it goes. Once the
//! buffer is full it refuses every key until [`InputCollector::reset`] is
//! called; refused keys are dropped, never queued.

use doorlock_core::{Credential, KeySymbol, constants::CREDENTIAL_LENGTH};

use crate::screen::{DisplayCommand, EchoLayout};

/// Bounded entry buffer with a fill cursor.
///
/// Unused and wiped slots hold `None`, so a reset buffer carries no trace of
/// the previous entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    slots: [Option<KeySymbol>; CREDENTIAL_LENGTH],
    count: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of symbols captured so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of symbols.
    pub fn capacity(&self) -> usize {
        CREDENTIAL_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == CREDENTIAL_LENGTH
    }

    /// Returns `true` if no slot holds a symbol.
    pub fn is_wiped(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Store `symbol` at the cursor and return its index.
    ///
    /// Returns `None` without storing anything if the buffer is full.
    pub fn push(&mut self, symbol: KeySymbol) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.count;
        self.slots[index] = Some(symbol);
        self.count += 1;
        Some(index)
    }

    /// The complete entry, if the buffer is full.
    pub fn credential(&self) -> Option<Credential> {
        if !self.is_full() {
            return None;
        }
        let mut symbols = [self.slots[0]?; CREDENTIAL_LENGTH];
        for (symbol, slot) in symbols.iter_mut().zip(&self.slots) {
            *symbol = (*slot)?;
        }
        Some(Credential::new(symbols))
    }

    /// Overwrite every slot and rewind the cursor.
    pub fn wipe(&mut self) {
        self.slots.fill(None);
        self.count = 0;
    }
}

/// Result of offering a key to an [`InputCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCapture {
    /// The buffer was already full; the key is lost.
    Discarded,

    /// The key was stored; echo it with these commands.
    Accepted(Vec<DisplayCommand>),

    /// The key was stored and completed the entry.
    Completed {
        commands: Vec<DisplayCommand>,
        entry: Credential,
    },
}

/// Accumulates keypresses into an [`InputBuffer`] and echoes them.
#[derive(Debug, Clone)]
pub struct InputCollector {
    buffer: InputBuffer,
    echo: EchoLayout,
}

impl InputCollector {
    pub fn new(echo: EchoLayout) -> Self {
        Self {
            buffer: InputBuffer::new(),
            echo,
        }
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    /// Offer one keypress.
    pub fn on_key(&mut self, symbol: KeySymbol) -> KeyCapture {
        let Some(index) = self.buffer.push(symbol) else {
            return KeyCapture::Discarded;
        };

        let commands = self.echo.commands(index, symbol);
        match self.buffer.credential() {
            Some(entry) => KeyCapture::Completed { commands, entry },
            None => KeyCapture::Accepted(commands),
        }
    }

    /// Wipe the buffer and accept keys again.
    pub fn reset(&mut self) {
        self.buffer.wipe();
    }
}
