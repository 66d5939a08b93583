//! Benchmarks for field and form validation
//!
//! Measures:
//! - Field::validate() with short-circuit vs. check-all
//! - Form::validate() over a multi-field definition
//! - Report rendering cost for classified vs. simple shapes

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use formguard::prelude::*;
use regex::Regex;

fn signup_definition() -> FormDefinition {
    FormDefinition::builder()
        .field(
            "username",
            Field::builder()
                .typical(CheckName::Matches, [Regex::new("(?i)^[-_a-z0-9]+$").unwrap()])
                .unwrap()
                .typical(CheckName::IsLength, [4, 16])
                .unwrap()
                .build(),
        )
        .unwrap()
        .field(
            "password",
            Field::builder()
                .check(CheckName::IsAlphanumeric)
                .unwrap()
                .typical(CheckName::IsLength, [8, 16])
                .unwrap()
                .build(),
        )
        .unwrap()
        .field(
            "gender",
            Field::builder()
                .typical(CheckName::IsIn, [["male", "female"]])
                .unwrap()
                .build(),
        )
        .unwrap()
        .build()
}

fn field_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/validate");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for check_all in [false, true] {
        let field = Field::builder()
            .check(CheckName::IsEmail)
            .unwrap()
            .typical(CheckName::IsLength, [4, 8])
            .unwrap()
            .should_check_all(check_all)
            .build();

        group.bench_with_input(
            BenchmarkId::new("email_then_length", check_all),
            &field,
            |b, field| {
                b.to_async(&rt)
                    .iter(|| async { black_box(field.validate(black_box("a@a")).await) });
            },
        );
    }

    let async_field = Field::builder()
        .specification(specification_fn(|input| async move {
            Ok(SpecOutcome::from(input.len() > 3))
        }))
        .build();
    group.bench_function("specification", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(async_field.validate(black_box("abcd")).await) });
    });

    group.finish();
}

fn form_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("form/validate");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let valid = Form::with_inputs(
        signup_definition(),
        [("username", "alice"), ("password", "abcd1234"), ("gender", "female")],
    );
    group.bench_function("valid", |b| {
        b.to_async(&rt).iter(|| async { black_box(valid.validate().await) });
    });

    let invalid = Form::with_inputs(
        signup_definition(),
        [("username", "my-username@"), ("password", "abcd123"), ("gender", "man")],
    );
    group.bench_function("invalid", |b| {
        b.to_async(&rt).iter(|| async { black_box(invalid.validate().await) });
    });

    group.finish();
}

fn report_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("reporter/report");

    let mut reporter = ErrorReporter::new();
    for index in 0..64 {
        reporter.error(format!("field_{}", index % 8), format!("message {index}"));
    }

    for mode in [ReportMode::Classified, ReportMode::Simple] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &mode,
            |b, mode| {
                b.iter(|| black_box(reporter.report(*mode)));
            },
        );
    }

    reporter.set_transform(str::to_uppercase);
    group.bench_function("classified_with_transform", |b| {
        b.iter(|| black_box(reporter.classified()));
    });

    group.finish();
}

criterion_group!(benches, field_validate, form_validate, report_rendering);
criterion_main!(benches);
