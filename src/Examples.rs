pub mod photometry_examples;
