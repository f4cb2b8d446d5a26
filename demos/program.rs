use qlisp::EvaluationContext;

fn main() -> anyhow::Result<()> {
    let program = vec![
        "(def {spam} (\\ {x} {* eggs x}))",
        "(spam 3)",
        "(def {eggs} 20)",
        "(spam 3)",
        "(def {pack} (\\ {first & rest} {cons first rest}))",
        "(pack 1 2 3)",
        "((spam) 2)",
    ];

    let mut context = EvaluationContext::new();
    for source in program {
        println!("{}: {}", source, context.evaluate_str(source)?);
    }

    Ok(())
}
