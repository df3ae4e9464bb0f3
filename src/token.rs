use std::{fmt};
use std::rc::{Rc};
use std::sync::{Mutex, OnceLock, PoisonError};

use arrayvec::{ArrayString};

use super::model::{Name, Value};
use super::{Concealment, Object};

/// The digits of token names.
const ALPHABET: &[u8; 48] = b"abcdefghijklmnopqrstwxyzABCDEFGHIJKLMNOPQRSTWXYZ";

/// The number of random characters appended to every generated name.
const SUFFIX_LEN: usize = 32;

/// A variable-length counter whose digits index [`ALPHABET`].
///
/// The most significant digit comes first.
#[derive(Debug, Default)]
struct Odometer(Vec<u8>);

impl Odometer {
    const fn new() -> Self { Self(Vec::new()) }

    /// Advance to the next value and render it.
    fn next(&mut self) -> String {
        let last = (ALPHABET.len() - 1) as u8;
        let mut carry = true;
        for digit in self.0.iter_mut().rev() {
            if *digit != last {
                *digit += 1;
                carry = false;
                break;
            }
            *digit = 0;
        }
        if carry { self.0.insert(0, 0); }
        self.0.iter().map(|&digit| ALPHABET[digit as usize] as char).collect()
    }
}

static COUNTER: Mutex<Odometer> = Mutex::new(Odometer::new());

static SUFFIX: OnceLock<ArrayString<SUFFIX_LEN>> = OnceLock::new();

/// The random part of every generated name, drawn once per process.
fn suffix() -> &'static str {
    SUFFIX.get_or_init(|| {
        let mut suffix = ArrayString::new();
        while !suffix.is_full() {
            let i = rand::random::<u32>() as usize % ALPHABET.len();
            suffix.push(ALPHABET[i] as char);
        }
        suffix
    })
}

// ----------------------------------------------------------------------------

struct Inner {
    name: Name,

    /// The length of the counter part of `name`.
    serial: usize,
}

/// An opaque property key used to mark objects with pseudo-private values.
///
/// A `Token` is equal only to its own clones. It is not a security
/// mechanism: anyone who learns the name can read the slot.
#[derive(Clone)]
pub struct Token(Rc<Inner>);

impl Token {
    /// Creates a token whose name differs from that of every token
    /// previously created by this process.
    pub fn create() -> Self {
        let serial = COUNTER.lock().unwrap_or_else(PoisonError::into_inner).next();
        let len = serial.len();
        let name: Name = (serial + suffix()).into();
        tracing::trace!(token = %name, "created token");
        Self(Rc::new(Inner {name, serial: len}))
    }

    /// Wraps an explicit name. Unlike [`Token::create()`], nothing stops two
    /// such tokens from sharing a name and therefore a slot.
    pub fn named(name: &str) -> Self {
        Self(Rc::new(Inner {name: name.into(), serial: name.len()}))
    }

    pub fn name(&self) -> &Name { &self.0.name }

    /// The counter part of the name.
    pub fn serial(&self) -> &str { &self.0.name[..self.0.serial] }

    /// The random part of the name. Empty for [`Token::named()`] tokens.
    pub fn suffix(&self) -> &str { &self.0.name[self.0.serial..] }

    /// Marks `target` with `value` under this token, hidden from
    /// enumeration. Replaces any previous mark.
    pub fn mark(&self, target: &Object, value: Value) {
        self.mark_with(target, value, Concealment::Hidden);
    }

    /// Like [`Token::mark()`] with an explicit [`Concealment`].
    pub fn mark_with(&self, target: &Object, value: Value, concealment: Concealment) {
        target.define(self.0.name.clone(), value, concealment.visible());
    }

    /// Returns the value `target` or its prototype chain is marked with.
    pub fn read(&self, target: &Object) -> Option<Value> { target.get(&self.0.name) }

    /// Returns `true` if `target` or its prototype chain carries this mark.
    pub fn marks(&self, target: &Object) -> bool { target.has(&self.0.name) }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.0.name) }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Token").field(&self.serial()).finish()
    }
}

/// Passes `N` fresh tokens to `f` and returns its result.
///
/// ```
/// let (a, b) = ilk::tokens(|[a, b]: [ilk::Token; 2]| (a, b));
/// assert_ne!(a, b);
/// ```
pub fn tokens<const N: usize, R>(f: impl FnOnce([Token; N]) -> R) -> R {
    f(std::array::from_fn(|_| Token::create()))
}

// ----------------------------------------------------------------------------
