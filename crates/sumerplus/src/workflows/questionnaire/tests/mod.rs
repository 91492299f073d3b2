mod common;
mod report;
mod scoring;
