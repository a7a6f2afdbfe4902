mod driver;
mod printer;

pub use self::printer::Help;
pub(crate) use self::driver::consume_all;
pub(crate) use self::printer::Usage;
