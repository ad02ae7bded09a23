mod error_tests;
mod formatting_tests;
