use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pl0c_lex::Lexer;
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

fn bench_lex_gcd(c: &mut Criterion) {
    c.bench_function("lex gcd sample", |b| {
        b.iter(|| {
            let mut interner = Interner::new();
            let mut handler = Handler::new();
            let tokens = Lexer::new(black_box(GCD_SOURCE), &mut interner, &mut handler).tokenize();
            black_box(tokens)
        })
    });
}

criterion_group!(benches, bench_lex_gcd);
criterion_main!(benches);
