use inflector::Inflector;

use super::{CodeWriter, Formatter, Unit};

pub struct C;

impl Formatter for C {
    fn comment(&self) -> &'static str {
        "//"
    }

    fn render(&self, unit: &Unit, w: &mut CodeWriter) {
        let prefix = unit.class_name.to_snake_case();
        let sections = format!("{}_SECTIONS", unit.class_name.to_screaming_snake_case());
        let state = format!("{prefix}_t");

        w.line(format!("#define {sections} {}", unit.section_count()));
        w.blank();
        w.block("typedef struct {", &format!("}} {state};"), |w| {
            w.line(format!("double z1[{sections}];"));
            w.line(format!("double z2[{sections}];"));
        });
        w.blank();

        let reset_body = |w: &mut CodeWriter| {
            w.block(
                format!("for (int i = 0; i < {sections}; i++) {{"),
                "}",
                |w| {
                    w.line("f->z1[i] = 0.0;");
                    w.line("f->z2[i] = 0.0;");
                },
            );
        };

        w.block(format!("void {prefix}_init({state} *f) {{"), "}", reset_body);
        w.blank();

        w.block(
            format!("double {prefix}_process({state} *f, double input) {{"),
            "}",
            |w| {
                w.line("double output = input;");
                w.line("double x;");
                for (i, c) in unit.literals() {
                    w.blank();
                    w.line(format!("/* Biquad section {i} */"));
                    w.line(format!(
                        "x = output - ({} * f->z1[{i}]) - ({} * f->z2[{i}]);",
                        c.a1, c.a2
                    ));
                    w.line(format!(
                        "output = {} * x + {} * f->z1[{i}] + {} * f->z2[{i}];",
                        c.b0, c.b1, c.b2
                    ));
                    w.line(format!("f->z2[{i}] = f->z1[{i}];"));
                    w.line(format!("f->z1[{i}] = x;"));
                }
                w.blank();
                w.line("return output;");
            },
        );
        w.blank();

        w.block(format!("void {prefix}_reset({state} *f) {{"), "}", reset_body);
    }

    fn usage(&self, unit: &Unit) -> Vec<String> {
        let prefix = unit.class_name.to_snake_case();
        vec![
            "Example usage:".to_string(),
            format!("{prefix}_t filter;"),
            format!("{prefix}_init(&filter);"),
            format!("double filtered = {prefix}_process(&filter, sample);"),
        ]
    }
}
