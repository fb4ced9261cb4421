//! Code generation for the C target

use std::io::{self, Write};
use std::iter::repeat;

use crate::{
    ir::{Backend, Event, Statement},
    settings::Settings,
};

/// Start of every comment line
const COMMENT_PREFIX: &str = "// ";

/// Runtime scaffolding emitted before the first statement.
///
/// The tape starts with `init_size` zeroed cells. `move()` grows it by
/// `extend_size` cells at a time, on the left (shifting existing cells
/// right and renumbering the pointer) or on the right, until the new
/// pointer is in range.
pub fn generate_preamble(settings: &Settings) -> String {
    let t = settings.cell_type.as_str();
    let mut s: String = "#include <stdlib.h>\n#include <stdio.h>\n".into();
    s += "#include <errno.h>\n#include <string.h>\n\n";
    s += format!("#define INITIAL_MEM_SIZE ({})\n", settings.init_size).as_str();
    s += format!("#define MEM_INC_SIZE ({})\n\n", settings.extend_size).as_str();
    s += "size_t current_size = INITIAL_MEM_SIZE;\n";
    s += format!("{t}* mem;\n").as_str();
    s += "long long ptr = 0;\n\n";

    s += "void mem_fail(void) {\n";
    s += "\tfprintf(stderr, \"error while allocating memory: %s\\n\", strerror(errno));\n";
    s += "\texit(1);\n";
    s += "}\n\n";

    s += "void move(long long i) {\n";
    s += "\tlong long ptr_new = ptr + i;\n";
    s += "\twhile (ptr_new < 0) {\n";
    s += "\t\tsize_t new_size = current_size + MEM_INC_SIZE;\n";
    s += format!("\t\tmem = realloc(mem, new_size * sizeof({t}));\n").as_str();
    s += "\t\tif (mem == NULL)\n\t\t\tmem_fail();\n";
    s += format!("\t\tmemmove(mem + MEM_INC_SIZE, mem, current_size * sizeof({t}));\n").as_str();
    s += format!("\t\tmemset(mem, 0, MEM_INC_SIZE * sizeof({t}));\n").as_str();
    s += "\t\tcurrent_size = new_size;\n";
    s += "\t\tptr_new += MEM_INC_SIZE;\n";
    s += "\t}\n";
    s += "\twhile (ptr_new >= (long long)current_size) {\n";
    s += "\t\tsize_t new_size = current_size + MEM_INC_SIZE;\n";
    s += format!("\t\tmem = realloc(mem, new_size * sizeof({t}));\n").as_str();
    s += "\t\tif (mem == NULL)\n\t\t\tmem_fail();\n";
    s += format!("\t\tmemset(mem + current_size, 0, MEM_INC_SIZE * sizeof({t}));\n").as_str();
    s += "\t\tcurrent_size = new_size;\n";
    s += "\t}\n";
    s += "\tptr = ptr_new;\n";
    s += "}\n\n";

    s += "void init(void) {\n";
    s += format!("\tmem = malloc(current_size * sizeof({t}));\n").as_str();
    s += "\tif (mem == NULL)\n\t\tmem_fail();\n";
    s += format!("\tmemset(mem, 0, current_size * sizeof({t}));\n").as_str();
    s += "}\n\n";

    s += "int main(void) {\n";
    s += "\tinit();\n\n";
    s
}

/// Runtime teardown emitted after the last statement.
pub fn generate_postamble() -> String {
    "\n\tfree(mem);\n\treturn 0;\n}\n".into()
}

/// Render one statement at the given loop depth.
///
/// Everything lives inside `main`, so depth 0 is one tab deep.
pub fn generate_statement(stmt: &Statement, depth: usize) -> String {
    let body = match stmt {
        Statement::Add(n) => format!("*(mem + ptr) += {n};"),
        Statement::Move(n) => format!("move({n});"),
        Statement::Output => "putchar(*(mem + ptr));".into(),
        Statement::Input => "*(mem + ptr) = getchar();".into(),
        Statement::BeginLoop => "while (*(mem + ptr)) {".into(),
        Statement::EndLoop => "}".into(),
    };
    format!("{}{}\n", indent(depth + 1), body)
}

/// Compute the indentation string for a given indentation level.
fn indent(i: usize) -> String {
    String::from_iter(repeat("\t").take(i))
}

/// A [`Backend`] writing C source to a byte sink.
pub struct CWriter<'s, W: Write> {
    out: W,
    settings: &'s Settings,
    /// The current comment line ends in a backslash (plus blanks), which C
    /// would splice with the following line.
    line_splice: bool,
    /// A bare `\r` was written. C treats it as a line end, so any further
    /// comment text needs a fresh comment prefix.
    after_cr: bool,
}

impl<'s, W: Write> CWriter<'s, W> {
    pub fn new(out: W, settings: &'s Settings) -> Self {
        Self {
            out,
            settings,
            line_splice: false,
            after_cr: false,
        }
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn end_comment_line(&mut self) -> io::Result<()> {
        self.after_cr = false;
        if self.line_splice {
            self.out.write_all(b"//")?;
            self.line_splice = false;
        }
        self.out.write_all(b"\n")
    }

    fn start_comment_line(&mut self, depth: usize) -> io::Result<()> {
        write!(self.out, "{}{}", indent(depth + 1), COMMENT_PREFIX)
    }
}

impl<W: Write> Backend for CWriter<'_, W> {
    fn emit(&mut self, depth: usize, event: Event) -> io::Result<()> {
        match event {
            Event::Preamble => self
                .out
                .write_all(generate_preamble(self.settings).as_bytes()),
            Event::Statement(ref stmt) => self
                .out
                .write_all(generate_statement(stmt, depth).as_bytes()),
            Event::CommentStart => self.start_comment_line(depth),
            Event::CommentByte(c) => {
                if self.after_cr {
                    self.after_cr = false;
                    self.start_comment_line(depth)?;
                }
                match c {
                    b'\r' => {
                        if self.line_splice {
                            self.out.write_all(b"//")?;
                            self.line_splice = false;
                        }
                        self.after_cr = true;
                    }
                    b'\\' => self.line_splice = true,
                    b' ' | b'\t' => (),
                    _ => self.line_splice = false,
                }
                self.out.write_all(&[c])
            }
            Event::CommentBreak => {
                self.end_comment_line()?;
                self.start_comment_line(depth)
            }
            Event::CommentEnd => self.end_comment_line(),
            Event::Postamble => {
                self.out.write_all(generate_postamble().as_bytes())?;
                self.out.flush()
            }
        }
    }
}
