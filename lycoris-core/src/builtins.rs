//! Seeds the dictionary with the built-in word set. Called once from
//! [`crate::interpreter::Interpreter::new`]; built-ins can be neither
//! removed nor shadowed afterwards.

use crate::dictionary::{Dictionary, PrimitiveFn};
use crate::primitives::{arith, compare, def, exec, io, stack, vector};

pub fn register(dict: &mut Dictionary) {
    let mut add = |name: &str, op: PrimitiveFn| dict.insert_builtin(name, op);

    // Arithmetic
    add("add", arith::add_impl);
    add("sub", arith::sub_impl);
    add("mul", arith::mul_impl);
    add("div", arith::div_impl);
    add("pow", arith::pow_impl);
    add("mod", arith::mod_impl);

    // Comparison
    add("eq", compare::eq_impl);
    add("lt", compare::lt_impl);
    add("gt", compare::gt_impl);
    add("le", compare::le_impl);
    add("ge", compare::ge_impl);

    // Stack shuffling
    add("dup", stack::dup_impl);
    add("drop", stack::drop_impl);
    add("swap", stack::swap_impl);
    add("over", stack::over_impl);
    add("rot", stack::rot_impl);

    // Vectors
    add("vec", vector::vec_impl);
    add("unpack", vector::unpack_impl);
    add("nth", vector::nth_impl);
    add("get", vector::nth_impl);
    add("set", vector::set_impl);
    add("slice", vector::slice_impl);
    add("length", vector::length_impl);
    add("concat", vector::concat_impl);
    add("append", vector::append_impl);

    // Execution control
    add("run", exec::run_impl);
    add("quote", exec::quote_impl);

    // Definitions
    add("def", def::def_impl);
    add("undef", def::undef_impl);

    // Output
    add("print", io::print_impl);
    add("clear", io::clear_impl);
    add("words", io::words_impl);
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;

    #[test]
    fn test_builtin_set_is_seeded() {
        let interp = Interpreter::new();
        for name in [
            "add", "sub", "mul", "div", "pow", "mod", "eq", "lt", "gt", "le", "ge", "dup",
            "drop", "swap", "over", "rot", "vec", "unpack", "nth", "get", "set", "slice",
            "length", "concat", "append", "run", "quote", "def", "undef", "print", "clear",
            "words",
        ] {
            assert!(
                interp.dictionary().is_builtin(name),
                "missing built-in '{}'",
                name
            );
        }
    }
}
