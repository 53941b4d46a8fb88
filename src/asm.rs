//! Assembling statement sequences into binary images.
//!
//! This module handles the back half of the assembly pipeline. Given the
//! statements produced by [`parse`], it binds every label to the address of
//! the instruction that follows it, allocates RAM slots for variables in
//! order of first appearance, and encodes each instruction into a 16-bit
//! machine word.
//!
//! This module notably consists of:
//! - [`assemble`], the entry point turning statements into an [`Image`],
//! - [`SymbolTable`], the mapping from symbols to addresses,
//! - [`Word`] and [`Image`], the encoded output.
//!
//! [`parse`]: crate::parse

use std::collections::HashMap;

use crate::ast::{ImmOrSym, Stmt, StmtKind, PREDEFINED};

/// Assembles a sequence of statements into a binary image.
///
/// This is infallible: every failure mode lives in the source text, and the
/// parser has already rejected all of them. A symbol that is neither
/// predefined nor declared as a label is, by definition, a variable and
/// gets the next free RAM slot.
///
/// ## Example
/// ```
/// use hack_ensemble::asm::assemble;
/// use hack_ensemble::parse::parse_program;
///
/// let stmts = parse_program("@2\nD=A").unwrap();
/// let image = assemble(&stmts);
/// assert_eq!(image.to_string(), "0000000000000010\n1110110000010000\n");
/// ```
pub fn assemble(stmts: &[Stmt]) -> Image {
    let mut sym_table = SymbolTable::new(stmts);
    Image::new(stmts, &mut sym_table)
}

/// The mapping from symbols to addresses.
///
/// A fresh table starts out with the [predefined symbols] and the label
/// bindings collected from a statement sequence. Variable slots (RAM 16
/// upward) are handed out lazily by [`SymbolTable::resolve`] as unknown
/// symbols come up during encoding.
///
/// ## Example
/// ```
/// use hack_ensemble::asm::SymbolTable;
/// use hack_ensemble::parse::parse_program;
///
/// let stmts = parse_program("@R1\n(LOOP)\nD=D-1\n@LOOP\nD;JGT").unwrap();
/// let sym_table = SymbolTable::new(&stmts);
/// assert_eq!(sym_table.lookup("LOOP"), Some(1));
/// assert_eq!(sym_table.lookup("R1"), Some(1));
/// assert_eq!(sym_table.lookup("ELSEWHERE"), None);
/// ```
///
/// [predefined symbols]: PREDEFINED
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SymbolTable {
    /// The table itself.
    symbols: HashMap<String, u16>,
    /// The next free RAM slot for a variable.
    next_var: u16,
}

impl SymbolTable {
    /// Creates a table holding the predefined symbols and the label bindings
    /// of the given statements.
    ///
    /// Each label binds to the index of the next instruction, so a label at
    /// the very start binds to 0, consecutive labels bind to the same
    /// address, and a trailing label binds one past the last instruction.
    pub fn new(stmts: &[Stmt]) -> Self {
        let mut symbols: HashMap<_, _> = PREDEFINED.iter()
            .map(|&(sym, addr)| (sym.to_string(), addr))
            .collect();

        // PASS 1
        let mut index: u16 = 0;
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Label(name) => {
                    symbols.insert(name.clone(), index & 0x7FFF);
                }
                _ => index = index.wrapping_add(1),
            }
        }

        SymbolTable { symbols, next_var: 16 }
    }

    /// Gets the address a symbol is bound to, if it is bound.
    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    /// Gets the address of a symbol, binding it to the next free variable
    /// slot if it is not bound yet.
    ///
    /// ## Example
    /// ```
    /// use hack_ensemble::asm::SymbolTable;
    ///
    /// let mut sym_table = SymbolTable::new(&[]);
    /// assert_eq!(sym_table.resolve("i"), 16);
    /// assert_eq!(sym_table.resolve("j"), 17);
    /// assert_eq!(sym_table.resolve("i"), 16);
    /// assert_eq!(sym_table.resolve("KBD"), 24576);
    /// ```
    pub fn resolve(&mut self, name: &str) -> u16 {
        match self.lookup(name) {
            Some(addr) => addr,
            None => {
                let addr = self.next_var & 0x7FFF;
                self.symbols.insert(name.to_string(), addr);
                self.next_var = self.next_var.wrapping_add(1);
                addr
            }
        }
    }

    /// Iterates over all bindings in the table, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> + '_ {
        self.symbols.iter().map(|(sym, &addr)| (sym.as_str(), addr))
    }
}

/// A single 16-bit machine word.
///
/// Its `Display` form is the word as it appears in the output: 16 binary
/// digits, most significant first, zero-padded.
///
/// ## Example
/// ```
/// use hack_ensemble::asm::Word;
///
/// let word = Word::new(0b1110110000010000);
/// assert_eq!(word.to_string(), "1110110000010000");
/// assert_eq!(word.bits(), 0xEC10);
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Word(u16);

impl Word {
    /// Creates a word from its bits.
    pub fn new(bits: u16) -> Self {
        Word(bits)
    }

    /// The bits of this word.
    pub fn bits(self) -> u16 {
        self.0
    }
}
impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

/// A fully assembled program: one [`Word`] per instruction, in source order.
///
/// Label declarations contribute no word. The `Display` form is the machine
/// code as written to disk, one word per line with a trailing line break.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Image {
    words: Vec<Word>,
}

impl Image {
    /// Creates a new image by encoding each statement against the given
    /// symbol table.
    fn new(stmts: &[Stmt], sym_table: &mut SymbolTable) -> Self {
        let mut words = Vec::with_capacity(stmts.len());

        // PASS 2
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Addr(target) => {
                    let addr = match target {
                        ImmOrSym::Imm(imm) => *imm,
                        ImmOrSym::Sym(sym) => sym_table.resolve(sym),
                    };
                    // Address words keep the top bit clear.
                    words.push(Word::new(addr & 0x7FFF));
                }
                StmtKind::Compute(instr) => words.push(Word::new(instr.encode())),
                StmtKind::Label(_) => {}
            }
        }

        Image { words }
    }

    /// Creates an image without any words.
    pub fn empty() -> Self {
        Image { words: vec![] }
    }

    /// The encoded words, in source order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// The number of words in this image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether this image holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for word in &self.words {
            writeln!(f, "{word}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::parse_program;

    use super::{assemble, Image, SymbolTable, Word};

    fn assemble_src(src: &str) -> Image {
        let stmts = parse_program(src)
            .unwrap_or_else(|errs| panic!("expected {src:?} to parse, got {errs:?}"));
        assemble(&stmts)
    }
    fn words(image: &Image) -> Vec<String> {
        image.words().iter().map(Word::to_string).collect()
    }

    #[test]
    fn test_add_program() {
        let image = assemble_src("@2\nD=A\n@3\nD=D+A\n@0\nM=D");
        assert_eq!(words(&image), vec![
            "0000000000000010",
            "1110110000010000",
            "0000000000000011",
            "1110000010010000",
            "0000000000000000",
            "1110001100001000",
        ]);
    }

    #[test]
    fn test_label_resolution() {
        let image = assemble_src("(LOOP)\n@LOOP\n0;JMP");
        assert_eq!(words(&image), vec![
            "0000000000000000",
            "1110101010000111",
        ]);

        // The forward reference in line 1 resolves to the address bound in
        // line 3, two instructions in.
        let image = assemble_src("@END\n0;JMP\n(END)\n@END\n0;JMP");
        assert_eq!(words(&image), vec![
            "0000000000000010",
            "1110101010000111",
            "0000000000000010",
            "1110101010000111",
        ]);
    }

    #[test]
    fn test_label_positions() {
        // A label before any instruction binds to 0.
        let image = assemble_src("(START)\n@START");
        assert_eq!(words(&image), vec!["0000000000000000"]);

        // Consecutive labels bind to the same address.
        let image = assemble_src("(HERE)\n(ALSO_HERE)\n@HERE\n@ALSO_HERE");
        assert_eq!(words(&image), vec!["0000000000000000", "0000000000000000"]);

        // A trailing label binds one past the last instruction.
        let image = assemble_src("@END\n0;JMP\n(END)");
        assert_eq!(words(&image), vec!["0000000000000010", "1110101010000111"]);
    }

    #[test]
    fn test_variable_allocation() {
        // Variables take RAM 16 upward in order of first appearance, and a
        // repeated variable reuses its slot.
        let image = assemble_src("@i\nM=1\n@j\nM=1\n@i\nM=M+1");
        assert_eq!(words(&image), vec![
            "0000000000010000",
            "1110111111001000",
            "0000000000010001",
            "1110111111001000",
            "0000000000010000",
            "1111110111001000",
        ]);
    }

    #[test]
    fn test_label_is_not_a_variable() {
        // A symbol declared as a label anywhere in the program never becomes
        // a variable, even when the reference comes first.
        let image = assemble_src("@counter\nD=M\n(counter)\n@fresh");
        assert_eq!(words(&image), vec![
            "0000000000000010",
            "1111110000010000",
            "0000000000010000",
        ]);
    }

    #[test]
    fn test_predefined_symbols() {
        let image = assemble_src("@SP\n@LCL\n@ARG\n@THIS\n@THAT\n@R0\n@R15\n@SCREEN\n@KBD");
        assert_eq!(words(&image), vec![
            "0000000000000000",
            "0000000000000001",
            "0000000000000010",
            "0000000000000011",
            "0000000000000100",
            "0000000000000000",
            "0000000000001111",
            "0100000000000000",
            "0110000000000000",
        ]);
    }

    #[test]
    fn test_literal_truncation() {
        let image = assemble_src("@32767\n@32768\n@40000");
        assert_eq!(words(&image), vec![
            "0111111111111111",
            "0000000000000000",
            "0001110001000000",
        ]);
    }

    #[test]
    fn test_max_program() {
        let src = "
            // Computes R2 = max(R0, R1)

            @R0
            D=M
            @R1
            D=D-M
            @OUTPUT_FIRST
            D;JGT
            @R1
            D=M
            @OUTPUT_D
            0;JMP
            (OUTPUT_FIRST)
            @R0
            D=M
            (OUTPUT_D)
            @R2
            M=D
            (INFINITE_LOOP)
            @INFINITE_LOOP
            0;JMP
        ";
        let image = assemble_src(src);
        assert_eq!(words(&image), vec![
            "0000000000000000",
            "1111110000010000",
            "0000000000000001",
            "1111010011010000",
            "0000000000001010",
            "1110001100000001",
            "0000000000000001",
            "1111110000010000",
            "0000000000001100",
            "1110101010000111",
            "0000000000000000",
            "1111110000010000",
            "0000000000000010",
            "1110001100001000",
            "0000000000001110",
            "1110101010000111",
        ]);
    }

    #[test]
    fn test_assemble_twice() {
        // Assembly has no hidden state; the same statements always produce
        // the same image.
        let stmts = parse_program("@x\nM=1\n(L)\n@L\n0;JMP").unwrap();
        assert_eq!(assemble(&stmts), assemble(&stmts));
    }

    #[test]
    fn test_image_display() {
        let image = assemble_src("@21\nD=A");
        assert_eq!(image.to_string(), "0000000000010101\n1110110000010000\n");
        assert_eq!(image.len(), 2);
        assert!(!image.is_empty());

        let empty = Image::empty();
        assert_eq!(empty.to_string(), "");
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_symbol_table() {
        let stmts = parse_program("(ONE)\n@1\n(TWO)\n@2").unwrap();
        let mut sym_table = SymbolTable::new(&stmts);

        assert_eq!(sym_table.lookup("ONE"), Some(0));
        assert_eq!(sym_table.lookup("TWO"), Some(1));
        assert_eq!(sym_table.lookup("SP"), Some(0));
        assert_eq!(sym_table.lookup("nope"), None);

        // 23 predefined symbols plus the two labels.
        assert_eq!(sym_table.iter().count(), 25);

        // Resolving an unbound symbol binds it; resolving a bound one is a
        // plain lookup and burns no variable slot.
        assert_eq!(sym_table.resolve("TWO"), 1);
        assert_eq!(sym_table.resolve("fresh"), 16);
        assert_eq!(sym_table.iter().count(), 26);
        assert_eq!(sym_table.lookup("fresh"), Some(16));
    }
}
