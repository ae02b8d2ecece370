use crate::{
    Result,
    constants::{CREDENTIAL_LENGTH, KEYPAD_ALPHABET},
    error::Error,
};
use std::fmt;
use subtle::ConstantTimeEq;

/// One symbol of the 4x4 keypad alphabet (`0-9`, `*`, `#`, `A-D`).
///
/// The symbol is stored as its ASCII byte, which is also what gets printed
/// on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySymbol(u8);

impl KeySymbol {
    /// Create a symbol from a keypad character.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeySymbol` if the character is not on the keypad.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::KeySymbol;
    ///
    /// assert_eq!(KeySymbol::new('7').unwrap().as_char(), '7');
    /// assert!(KeySymbol::new('E').is_err());
    /// ```
    pub fn new(c: char) -> Result<Self> {
        if !KEYPAD_ALPHABET.contains(&c) {
            return Err(Error::InvalidKeySymbol(c));
        }
        Ok(KeySymbol(c as u8))
    }

    /// Get the symbol as a character.
    #[inline]
    #[must_use]
    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Get the symbol as its ASCII byte.
    #[inline]
    #[must_use]
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// Returns `true` for the digit keys.
    #[inline]
    #[must_use]
    pub fn is_digit(self) -> bool {
        self.0.is_ascii_digit()
    }
}

impl TryFrom<char> for KeySymbol {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        KeySymbol::new(c)
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A shared secret of exactly [`CREDENTIAL_LENGTH`] keypad symbols.
///
/// # Security
/// Comparison runs in constant time over the full length, and `Debug` never
/// prints the symbols.
#[derive(Clone, Copy, Eq)]
pub struct Credential([KeySymbol; CREDENTIAL_LENGTH]);

impl Credential {
    /// Create a credential from a complete set of symbols.
    #[must_use]
    pub fn new(symbols: [KeySymbol; CREDENTIAL_LENGTH]) -> Self {
        Credential(symbols)
    }

    /// Parse a credential from its textual form, e.g. `"1234"`.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if the text does not hold exactly
    /// [`CREDENTIAL_LENGTH`] keypad symbols.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::Credential;
    ///
    /// let code = Credential::parse("0800").unwrap();
    /// assert_eq!(code.expose(), "0800");
    ///
    /// assert!(Credential::parse("123").is_err());
    /// assert!(Credential::parse("12E4").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let count = text.chars().count();
        if count != CREDENTIAL_LENGTH {
            return Err(Error::InvalidCredential(format!(
                "expected {CREDENTIAL_LENGTH} symbols, got {count}"
            )));
        }

        let mut symbols = [KeySymbol(b'0'); CREDENTIAL_LENGTH];
        for (slot, c) in symbols.iter_mut().zip(text.chars()) {
            *slot = KeySymbol::new(c).map_err(|_| {
                Error::InvalidCredential(format!("{c:?} is not a keypad symbol"))
            })?;
        }
        Ok(Credential(symbols))
    }

    /// Get the symbols of the credential.
    #[must_use]
    pub fn symbols(&self) -> &[KeySymbol; CREDENTIAL_LENGTH] {
        &self.0
    }

    /// Reveal the credential as text.
    ///
    /// Only meant for configuration dumps and tests; never log the result.
    #[must_use]
    pub fn expose(&self) -> String {
        self.0.iter().map(|s| s.as_char()).collect()
    }

    fn as_bytes(&self) -> [u8; CREDENTIAL_LENGTH] {
        self.0.map(KeySymbol::as_byte)
    }
}

impl std::str::FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Credential::parse(s)
    }
}

impl From<[KeySymbol; CREDENTIAL_LENGTH]> for Credential {
    fn from(symbols: [KeySymbol; CREDENTIAL_LENGTH]) -> Self {
        Credential::new(symbols)
    }
}

/// Constant-time comparison implementation for Credential
///
/// Every position is compared, so the time taken does not depend on where
/// the two credentials first differ.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes()[..].ct_eq(&other.as_bytes()[..]).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}
