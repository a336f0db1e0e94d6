/// Creates an `eyre::Report`
#[macro_export]
macro_rules! make_report {
  ($($arg:tt)*) => {
    eyre::eyre!($($arg)*)
  };
}

/// Creates an `Err` variant carrying an `eyre::Report`
#[macro_export]
macro_rules! make_error {
  ($($arg:tt)*) => {
    Err($crate::make_report!($($arg)*))
  };
}

/// Creates a report for a condition that cannot occur on valid input.
/// Carries enough context for a post-mortem.
#[macro_export]
macro_rules! make_internal_report {
  ($($arg:tt)*) => {
    $crate::make_report!($($arg)*).wrap_err(
      "This is an internal error. Please report it to developers, attaching the input data and the exact command.",
    )
  };
}

/// `Err` variant of `make_internal_report!`
#[macro_export]
macro_rules! make_internal_error {
  ($($arg:tt)*) => {
    Err($crate::make_internal_report!($($arg)*))
  };
}
