#[cfg(test)]
mod tests {
    use crate::{minify_source, MinifyOptions, SymbolCategory};

    fn run(source: &str) -> String {
        minify_source(source, &MinifyOptions::default())
            .unwrap()
            .output
    }

    #[test]
    fn test_function_and_locals_renamed() {
        let out = run("int foo(int bar){ int baz = bar + 1; return baz; }\n");
        assert_eq!(out, "int a(int r){int s=r+1;return s;}");
    }

    #[test]
    fn test_comment_and_whitespace_stripped() {
        let out = run("/* note */ int   x ;\n");
        assert_eq!(out, "int x;");
    }

    #[test]
    fn test_sibling_functions_reuse_local_names() {
        let out = run("void fun(){int xx; xx;}\nvoid gun(){int yy; yy;}\n");
        assert_eq!(out, "void a(){int r;r;}void b(){int r;r;}");
    }

    #[test]
    fn test_nested_block_inherits_counter() {
        // The inner local must not collide with the still-visible outer one.
        let out = run("void fun(){int aa; {int bb; aa+bb;}}\n");
        assert_eq!(out, "void a(){int r;{int s;r+s;}}");
    }

    #[test]
    fn test_tentative_global_kept_initialized_renamed() {
        let out = run("int total = 1;\nint counter;\nint calc(){ return total + counter; }\n");
        assert_eq!(out, "int n=1;int counter;int a(){return n+counter;}");
    }

    #[test]
    fn test_prototype_and_definition_share_name() {
        let out = run("int ff(void);\nint ff(void){ return 0; }\n");
        assert_eq!(out, "int a(void);int a(void){return 0;}");
    }

    #[test]
    fn test_ignored_function_untouched() {
        let options = MinifyOptions {
            ignores: vec!["keepme".into()],
        };
        let source = "int keepme(void){ return 1; }\nint other(void){ return keepme(); }\n";
        let result = minify_source(source, &options).unwrap();
        assert_eq!(
            result.output,
            "int keepme(void){return 1;}int a(void){return keepme();}"
        );
    }

    #[test]
    fn test_entry_point_never_renamed() {
        let out = run("int main(void){ return 0; }\n");
        assert_eq!(out, "int main(void){return 0;}");
    }

    #[test]
    fn test_struct_enum_typedef_and_members() {
        let source = "struct Point { int xcoord; int ycoord; };\n\
                      enum Color { CRIMSON, EMERALD };\n\
                      typedef struct Point PointAlias;\n\
                      int dist(struct Point p){ return p.xcoord + p.ycoord; }\n";
        let out = run(source);
        assert_eq!(
            out,
            "struct A{int n;int o;};enum B{N,O};typedef struct A C;\
             int a(struct A p){return p.n+p.o;}"
        );
    }

    #[test]
    fn test_local_never_grows() {
        // `p` is already one character; any assigned name would tie or lose.
        let out = run("void fun(int p){ p; }\n");
        assert_eq!(out, "void a(int p){p;}");
    }

    #[test]
    fn test_local_shadowing_global() {
        let out = run("int gval = 1;\nvoid touch(){ int gval = 2; gval; }\n");
        assert_eq!(out, "int n=1;void a(){int r=2;r;}");
    }

    #[test]
    fn test_use_before_local_declaration_sees_global() {
        // The first `gval` precedes the local declaration and must keep
        // resolving to the file-scope variable.
        let out = run("int gval = 1;\nvoid fff(){ int yy = gval; int gval = 2; gval; }\n");
        assert_eq!(out, "int n=1;void a(){int r=n;int s=2;s;}");
    }

    #[test]
    fn test_macro_names_and_bodies_untouched() {
        let source = "#define INCR(x) \\\n  ((x) + 1)\nint main(void) { return INCR(1); }\n";
        let out = run(source);
        assert_eq!(out, "#define INCR(x)((x)+1)\nint main(void){return INCR(1);}");
    }

    #[test]
    fn test_source_spelling_blocks_short_name() {
        // A source-level `a` forces the first function onto the next letter.
        let out = run("int a = 1;\nvoid first(){ a; }\nvoid second(){ a; }\n");
        assert!(out.contains("void b(){"));
        assert!(out.contains("void c(){"));
    }

    #[test]
    fn test_constructor_and_member_initializer() {
        let out = run("struct Widget { int length; Widget() : length(0) {} };\n");
        assert!(out.contains("struct A{"), "got: {out}");
        assert!(out.contains("A():n(0){}"), "got: {out}");
    }

    #[test]
    fn test_destructor_tracks_class_name() {
        let out = run("struct Widget { int length; ~Widget(); };\n");
        assert!(out.contains("struct A{"), "got: {out}");
        assert!(out.contains("~A();"), "got: {out}");
    }

    #[test]
    fn test_template_type_parameter_renamed() {
        let out = run("template <typename TVal> TVal twice(TVal v) { return v + v; }\n");
        assert_eq!(out, "template<typename A>A a(A v){return v+v;}");
    }

    #[test]
    fn test_rename_records_reported() {
        let source = "int foo(int bar){ return bar; }\n";
        let result = minify_source(source, &MinifyOptions::default()).unwrap();
        let foo = result
            .renames
            .iter()
            .find(|r| r.from == "foo")
            .expect("foo renamed");
        assert_eq!(foo.to, "a");
        assert!(matches!(foo.category, SymbolCategory::Function));
        let bar = result
            .renames
            .iter()
            .find(|r| r.from == "bar")
            .expect("bar renamed");
        assert_eq!(bar.to, "r");
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let err = minify_source("int x; /* open\n", &MinifyOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_function_alphabet_wraps_with_suffix() {
        let source = "int alpha(){return 0;}\nint beta(){return 0;}\n\
                      int gamma(){return 0;}\nint delta(){return 0;}\n\
                      int epsilon(){return 0;}\nint zeta(){return 0;}\n\
                      int eta(){return 0;}\nint theta(){return 0;}\n\
                      int iota(){return 0;}\nint kappa(){return 0;}\n\
                      int lambda(){return 0;}\nint mu(){return 0;}\n\
                      int nu(){return 0;}\nint omicron(){return 0;}\n";
        let result = minify_source(source, &MinifyOptions::default()).unwrap();
        let assigned: Vec<&str> = result.renames.iter().map(|r| r.to.as_str()).collect();
        // Fourteen functions: a..m, then the counter overflows into a
        // base-62 suffix. The suffix starts at 1; a zero contributes no
        // digit, so "a0" never appears.
        assert_eq!(
            assigned[..13].to_vec(),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m"]
        );
        assert_eq!(assigned[13], "a1");
    }
}
