//! A Hack assembly parser and assembler.
//!
//! This is a translator for the Hack machine language
//! (the 16-bit architecture built over the course of nand2tetris),
//! turning symbolic assembly source into binary machine code.
//!
//! # Usage
//!
//! To convert Hack source code to machine code, it must be parsed and assembled:
//! ```
//! use hack_ensemble::parse::parse_program;
//! use hack_ensemble::asm::{assemble, Image};
//!
//! let code = "
//!     @2
//!     D=A
//!     @3
//!     D=D+A
//! ";
//! let stmts = parse_program(code).unwrap();
//!
//! // Assemble statements into a binary image:
//! let image: Image = assemble(&stmts);
//! assert_eq!(image.words()[0].to_string(), "0000000000000010");
//! ```
//!
//! Parsing checks the whole program before assembly is allowed to start,
//! and reports every offending line:
//! ```
//! use hack_ensemble::parse::parse_program;
//!
//! let errs = parse_program("@2\n@1X\nD=A").unwrap_err();
//! assert_eq!(errs[0].to_string(), "Invalid symbol name in line 2: @1X");
//! ```
//!
//! The image's `Display` form is the `.hack` text format, one word per line:
//! ```
//! # use hack_ensemble::parse::parse_program;
//! # use hack_ensemble::asm::assemble;
//! #
//! let stmts = parse_program("@foo\nM=1").unwrap();
//! let image = assemble(&stmts);
//! assert_eq!(image.to_string(), "0000000000010000\n1110111111001000\n");
//! ```
//!
//! The `hasm` binary wraps this pipeline into a file-to-file translator.
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod asm;
pub mod err;
