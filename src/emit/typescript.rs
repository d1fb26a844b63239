use super::{
    javascript::{process_body, zero_state},
    CodeWriter, Formatter, Unit,
};

pub struct Typescript;

impl Formatter for Typescript {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        w.block(format!("export class {} {{", unit.class_name), "}", |w| {
            for i in 0..unit.section_count() {
                w.line(format!("private z1_{i}: number = 0.0;"));
                w.line(format!("private z2_{i}: number = 0.0;"));
            }
            w.blank();

            w.block("process(inputSample: number): number {", "}", |w| {
                w.line("let output: number = inputSample;");
                process_body(unit, w, "const", ": number");
            });
            w.blank();

            w.block("reset(): void {", "}", |w| zero_state(unit, w));
        });
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let name = unit.class_name;
        vec![
            "Example usage:".to_string(),
            format!("const filter = new {name}();"),
            "const filtered: number = filter.process(sample);".to_string(),
        ]
    }
}
