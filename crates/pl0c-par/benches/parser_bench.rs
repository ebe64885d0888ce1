use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pl0c_lex::Lexer;
use pl0c_par::Parser;
use pl0c_util::{Handler, Interner};

const GCD_SOURCE: &str = r#"
program gcd;
var x, y, z;
procedure g;
  var f, g;
  begin
    f := x; g := y;
    while f <> g do
    begin
      if f < g then g := g - f;
      if g < f then f := f - g
    end;
    z := f
  end;
begin
  x := 84; y := 36; call g; write(z)
end.
"#;

fn bench_parse_gcd(c: &mut Criterion) {
    c.bench_function("parse gcd sample", |b| {
        b.iter(|| {
            let mut interner = Interner::new();
            let mut handler = Handler::new();
            let tokens = Lexer::new(black_box(GCD_SOURCE), &mut interner, &mut handler).tokenize();
            let program = Parser::new(tokens, &mut handler, &mut interner).parse_program();
            black_box(program)
        })
    });
}

criterion_group!(benches, bench_parse_gcd);
criterion_main!(benches);
