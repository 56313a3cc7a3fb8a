//! Pipeline tests: compile whole programs and assert on the shape of
//! the emitted assembly, plus every class of fatal diagnostic.

use toyccomp::compile;

fn compile_ok(source: &str) -> String {
    match compile(source) {
        Ok(assembly) => assembly,
        Err(error) => panic!("compilation failed: {error}"),
    }
}

fn compile_err(source: &str) -> String {
    match compile(source) {
        Ok(_) => panic!("compilation unexpectedly succeeded"),
        Err(error) => error.to_string(),
    }
}

#[test]
fn arithmetic_precedence_program() {
    let asm = compile_ok("void main() { int x; x = 2 + 3 * 4; print(x); }");

    assert!(asm.contains("global main"));
    assert!(asm.contains("main:"));
    assert!(asm.contains("\timul\tr13, r14"));
    assert!(asm.contains("\tadd\tr12, r13"));
    assert!(asm.contains("\tmov\tdword [x], r12d"));
    assert!(asm.contains("\tcall\tprint"));
    assert!(asm.contains("\tx resd 1"));
}

#[test]
fn for_loop_program() {
    let asm = compile_ok(
        "void main() { int i; for (i = 0; i < 3; i = i + 1) { print(i); } }",
    );

    assert!(asm.contains("\tsetl\tr12b"));
    assert!(asm.contains("\tmovzx\tr12, r12b"));
    assert!(asm.contains("\tcmp\tr12, 1"));
    assert!(asm.contains("\tjne\t__label__"));
    assert!(asm.contains("\tjmp\t__label__"));
}

#[test]
fn do_while_program() {
    let asm = compile_ok(
        "void main() { int x; x = 5; do { print(x); x = x - 1; } while (x > 0); }",
    );

    assert!(asm.contains("\tsetg\tr12b"));
    assert!(asm.contains("\tje\t__label__"));
    assert!(asm.contains("\tsub\tr12, r13"));
}

#[test]
fn char_array_program() {
    let asm = compile_ok(
        "void main() { char a[4]; a[0]=65; a[1]=66; a[2]=67; a[3]=0; print_str(a); }",
    );

    assert!(asm.contains("\ta resb 4"));
    // element stores go through a scratch base register
    assert!(asm.contains("\tlea\tr14, [a]"));
    assert!(asm.contains("\tmov\tbyte [r14], r12b"));
    // passing the array passes its address
    assert!(asm.contains("\tlea\tr12, [a]"));
    assert!(asm.contains("\tcall\tprint_str"));
}

#[test]
fn function_call_program() {
    let asm = compile_ok("int add(int a){ return a + 1; } void main(){ print(add(41)); }");

    assert!(asm.contains("global add"));
    assert!(asm.contains("add:"));
    assert!(asm.contains("global main"));
    // the formal argument is stored from rdi into its static slot
    assert!(asm.contains("\tmov\tdword [a], edi"));
    assert!(asm.contains("\ta resd 1"));
    // the return value travels through the width-matched rax alias
    assert!(asm.contains("\tmov\teax, r12d"));
    assert!(asm.contains("\tcall\tadd"));
}

#[test]
fn pointer_program() {
    let asm =
        compile_ok("void main(){ int x; int* p; x = 7; p = &x; *p = *p + 3; print(x); }");

    assert!(asm.contains("\tlea\tr12, [x]"));
    assert!(asm.contains("\tmov\tqword [p], r12"));
    assert!(asm.contains("\tp resq 1"));
    assert!(asm.contains("\tmov\tdword [r12], r13d"));
}

#[test]
fn string_literal_lands_in_data() {
    let asm = compile_ok("void main() { print_ln(\"hello\"); }");

    assert!(asm.contains("section .data"));
    assert!(asm.contains("\t__str__0 db \"hello\", 0"));
    assert!(asm.contains("\tlea\tr12, [__str__0]"));
}

#[test]
fn global_initializer_lands_in_data() {
    let asm = compile_ok("int x = 42; void main() { print(x); }");

    assert!(asm.contains("section .data"));
    assert!(asm.contains("\tx dd 42"));
}

#[test]
fn prologue_epilogue_shape() {
    let asm = compile_ok("void main() { }");

    assert!(asm.contains("\tpush\trbp"));
    assert!(asm.contains("\tmov\trbp, rsp"));
    // no return observed: the body falls through to a zero return
    assert!(asm.contains("\tmov\tal, 0"));
    assert!(asm.contains("\tpop\trbp"));
    assert!(asm.contains("\tret"));
}

#[test]
fn output_ends_with_gnu_stack_note() {
    let asm = compile_ok("void main() { }");

    assert!(asm
        .trim_end()
        .ends_with("section .note.GNU-stack noalloc noexec nowrite progbits"));
}

#[test]
fn runtime_functions_declared_extern() {
    let asm = compile_ok("void main() { }");

    for name in ["print", "print_char", "print_str", "print_ln"] {
        assert!(asm.contains(&format!("extern {name}")));
    }
}

#[test]
fn functions_keep_source_order() {
    let asm = compile_ok("void first() { } void second() { } void main() { }");

    let first = asm.find("first:").unwrap();
    let second = asm.find("second:").unwrap();
    let main = asm.find("main:").unwrap();
    assert!(first < second && second < main);
}

#[test]
fn labels_are_unique() {
    let asm = compile_ok(
        "void main() { int i; i = 0; while (i < 3) { if (i > 1) { print(i); } i = i + 1; } }",
    );

    let mut declared: Vec<&str> = asm
        .lines()
        .filter_map(|line| line.strip_suffix(':'))
        .filter(|line| line.starts_with("__label__"))
        .collect();
    let total = declared.len();
    declared.sort();
    declared.dedup();
    assert_eq!(declared.len(), total);
}

#[test]
fn nested_break_leaves_innermost_loop() {
    let asm = compile_ok(
        "void main() { while (1) { while (1) { break; } break; } }",
    );

    // two loops, two distinct break targets
    let breaks: Vec<&str> = asm
        .lines()
        .filter(|line| line.starts_with("\tjmp\t__label__"))
        .collect();
    assert!(breaks.len() >= 4);
}

#[test]
fn empty_update_for_loop_compiles() {
    let asm = compile_ok("void main() { int i; for (i = 0; i < 3;) { i = i + 1; } }");
    assert!(asm.contains("\tjne\t__label__"));
}

#[test]
fn scanner_errors() {
    assert!(compile_err("void main() { a ~ b; }").starts_with("[SCANNER]"));
    assert!(compile_err("void main() { int x; x = 1 ! 2; }").starts_with("[SCANNER]"));
}

#[test]
fn declaration_errors() {
    assert!(compile_err("void x;").starts_with("[DECL]"));
    assert!(compile_err("int x = 1 + 2;").starts_with("[DECL]"));
    assert!(compile_err("int f(int a, int b) { return a; }").starts_with("[DECL]"));
    assert!(compile_err("char a[0];").starts_with("[DECL]"));
}

#[test]
fn statement_errors() {
    assert!(compile_err("void main() { break; }").starts_with("[STMT]"));
    assert!(compile_err("int f() { return; }").starts_with("[STMT]"));
}

#[test]
fn expression_errors() {
    assert!(compile_err("void main() { y = 1; }").starts_with("[EXPR]"));
    assert!(compile_err("int x; void main() { x(1); }").starts_with("[EXPR]"));
    assert!(compile_err("void main() { print(); }").starts_with("[EXPR]"));
    assert!(compile_err("void main() { print(1, 2); }").starts_with("[EXPR]"));
    assert!(
        compile_err("int* p; void main() { p = p * 2; }").starts_with("[EXPR]")
    );
    assert!(
        compile_err("char a[4]; void main() { a = 0; }").starts_with("[EXPR]")
    );
}

#[test]
fn type_errors() {
    assert!(compile_err("void main() { char c; c = 1000; }").starts_with("[DATATYPE]"));
    assert!(
        compile_err("void f() { } void main() { int x; x = f() + 1; }")
            .starts_with("[DATATYPE]")
    );
    assert!(
        compile_err("int* p; char* q; void main() { p = q; }").starts_with("[DATATYPE]")
    );
}

#[test]
fn symbol_errors() {
    assert!(compile_err("int x; int x;").starts_with("[SYMTAB]"));
    assert!(compile_err("int print;").starts_with("[SYMTAB]"));
}

#[test]
fn register_exhaustion_is_fatal() {
    let err = compile_err(
        "void main() { int x; x = 1 + (2 + (3 + (4 + (5 + 6)))); }",
    );
    assert!(err.starts_with("[CG]"));
    assert!(err.contains("out of scratch registers"));
}

#[test]
fn deep_left_leaning_expression_fits_the_pool() {
    assert!(compile("void main() { int x; x = 1 + 2 + 3 + 4 + 5 + 6 + 7; }").is_ok());
}

#[test]
fn pointer_arithmetic_is_scaled() {
    let asm = compile_ok("void main() { int* p; long q; q = 0; p = q; p = p + 2; }");

    // int has 4-byte elements: the offset is shifted left by 2
    assert!(asm.contains("\tshl\tr13, 2"));
}

#[test]
fn long_and_pointer_interchange() {
    assert!(compile("long l; int* p; void main() { l = p; p = l; }").is_ok());
}
