use super::cli_main::get_user_input;
use crate::Examples::photometry_examples::photometry_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Homodimer reference dataset");
        println!("2. Heterocomplex reference dataset");
        println!("3. Homodimer histogram");
        println!("4. Speciation tables");
        println!("5. Count rounding comparison");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => photometry_examples(0),
            "2" => photometry_examples(1),
            "3" => photometry_examples(2),
            "4" => photometry_examples(3),
            "5" => photometry_examples(4),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
