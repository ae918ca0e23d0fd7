use std::fmt::{Display, Formatter};

use crate::base::*;
use crate::parser::cc::CharClass;
use crate::parser::{ByteCursor, ObjParser};
use crate::utils;

/// One content stream instruction: the operands in order, followed by the operator keyword.
#[derive(Debug, PartialEq, Clone)]
pub struct Command {
    pub operands: Vec<Object>,
    pub operator: String,
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for op in &self.operands {
            write!(f, "{op} ")?;
        }
        f.write_str(&self.operator)
    }
}

/// Splits a content stream into commands.
///
/// Operands are read with the object grammar, except that `N G R` is not an indirect reference
/// here. Any regular keyword other than `true`, `false` and `null` is an operator. Comments are
/// skipped. Operands left over at the end of the data are an error.
pub fn disassemble(data: &[u8]) -> Result<Vec<Command>, Error> {
    let mut cur = ByteCursor::new(data);
    let mut commands = Vec::new();
    let mut operands = Vec::new();
    while let Some(c) = cur.skip_whitespace() {
        if c == b'%' {
            cur.read_line();
            continue;
        }
        if !CharClass::is_regular(c) || matches!(c, b'0'..=b'9' | b'+' | b'-' | b'.') {
            operands.push(ObjParser::new(&mut cur).without_refs().parse()?);
            continue;
        }
        match cur.read_keyword() {
            b"true" => operands.push(Object::Bool(true)),
            b"false" => operands.push(Object::Bool(false)),
            b"null" => operands.push(Object::Null),
            kw => commands.push(Command {
                operands: std::mem::take(&mut operands),
                operator: utils::latin1(kw)
            })
        }
    }
    if !operands.is_empty() {
        return Err(Error::syntax(cur.pos(), "content stream ends with operands but no operator"));
    }
    Ok(commands)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(operands: Vec<Object>, operator: &str) -> Command {
        Command { operands, operator: operator.into() }
    }

    #[test]
    fn test_disassemble() {
        let data = b"q 1 0 0 -1 0 841.9 cm\nBT /F1 12 Tf (Hello) Tj ET % done\n[(A) -120 (B)] TJ 0 0 R Q";
        assert_eq!(disassemble(data).unwrap(), vec![
            cmd(vec![], "q"),
            cmd([1., 0., 0., -1., 0., 841.9].into_iter().map(Object::Number).collect(), "cm"),
            cmd(vec![], "BT"),
            cmd(vec![Object::new_name(b"F1"), Object::Number(12.)], "Tf"),
            cmd(vec![Object::new_string(b"Hello")], "Tj"),
            cmd(vec![], "ET"),
            cmd(vec![Object::Array(vec![
                Object::new_string(b"A"), Object::Number(-120.), Object::new_string(b"B")])], "TJ"),
            cmd(vec![Object::Number(0.), Object::Number(0.)], "R"),
            cmd(vec![], "Q"),
        ]);
    }

    #[test]
    fn test_operands() {
        let data = b"/P << /MCID 0 >> BDC true false null sh <0a1b> EMC";
        let cmds = disassemble(data).unwrap();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].operands[1].as_dict().unwrap().lookup(b"MCID"), &Object::Number(0.));
        assert_eq!(cmds[1], cmd(vec![Object::Bool(true), Object::Bool(false), Object::Null], "sh"));
        assert_eq!(cmds[2].operands, vec![Object::HexString("0a1b".into())]);
        assert_eq!(cmds[2].to_string(), "<0a1b> EMC");
    }

    #[test]
    fn test_errors() {
        assert!(disassemble(b"1 2").is_err());
        assert!(disassemble(b"(unterminated Tj").is_err());
        assert!(disassemble(b"] Tj").is_err());
        assert_eq!(disassemble(b"  \n").unwrap(), vec![]);
    }
}
