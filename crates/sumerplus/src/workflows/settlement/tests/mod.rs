mod common;
mod parser;
mod statement;
