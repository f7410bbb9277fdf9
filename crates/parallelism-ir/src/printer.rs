//! Canonical text printer for the IR
//!
//! Produces the same line-oriented `.pir` form the parser reads, with
//! two-space indentation for instructions.

use std::fmt;

use crate::{Function, Instruction, Module, Operand};

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, function) in self.functions().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| format!("%{}", p)).collect();
        writeln!(f, "fn {}({}) {{", self.name, params.join(", "))?;
        for block in self.blocks() {
            writeln!(f, "{}:", block.label)?;
            for inst in self.block_insts(block.id) {
                writeln!(f, "  {}", self.format_inst(inst))?;
            }
        }
        writeln!(f, "}}")
    }
}

impl Function {
    /// Render one instruction in `.pir` syntax
    pub fn format_inst(&self, inst: &Instruction) -> String {
        let operands: Vec<String> = inst.operands.iter().map(|op| self.format_operand(op)).collect();
        let mut line = String::new();
        if let Some(name) = &inst.name {
            line.push_str(&format!("%{} = ", name));
        }
        line.push_str(&inst.opcode);
        if !operands.is_empty() {
            line.push(' ');
            line.push_str(&operands.join(", "));
        }
        line
    }

    pub fn format_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Inst(id) => match self.get_inst(*id).and_then(|i| i.name.as_deref()) {
                Some(name) => format!("%{}", name),
                None => format!("%_{}", id.0),
            },
            Operand::Arg(i) => match self.params.get(*i) {
                Some(name) => format!("%{}", name),
                None => format!("%arg{}", i),
            },
            Operand::Const(v) => v.to_string(),
            Operand::Global(name) => format!("@{}", name),
            Operand::Label(id) => match self.blocks().get(id.index()) {
                Some(block) => block.label.clone(),
                None => format!("bb{}", id.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FunctionBuilder, Operand};

    #[test]
    fn test_print_function() {
        let mut b = FunctionBuilder::new("f");
        let x = b.param("x").unwrap();
        let entry = b.block("entry").unwrap();
        let exit = b.block("exit").unwrap();
        let a = b
            .inst(entry, Some("a"), "add", vec![x, Operand::Const(2)])
            .unwrap();
        b.inst(entry, None, "br", vec![Operand::Label(exit)]).unwrap();
        b.inst(exit, None, "ret", vec![Operand::Inst(a), Operand::Global("g".into())])
            .unwrap();
        let f = b.finish().unwrap();

        let expected = "fn f(%x) {\nentry:\n  %a = add %x, 2\n  br exit\nexit:\n  ret %a, @g\n}\n";
        assert_eq!(f.to_string(), expected);
    }
}
