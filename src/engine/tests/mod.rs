//! Engine behaviour tests, one file per concern.


mod account_tests;
mod matching_tests;
