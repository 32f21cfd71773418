//! Integration scenarios for `clr1-core`, see `tests/`.
