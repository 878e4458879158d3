mod helpers;

mod compile_tests;
mod while_tests;
