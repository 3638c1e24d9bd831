use std::time::{Duration, Instant};

use answer_browser::answer::parse_answer_text;
use answer_browser::omnibox::{classify, suggestions};
use answer_browser::{DebouncedField, Ledger, Session, TabUpdate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Undo/redo ledger throughput
fn benchmark_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");

    group.bench_function("set_1000", |b| {
        b.iter(|| {
            let mut ledger = Ledger::new(String::new());
            for i in 0..1000 {
                ledger.set(i.to_string());
            }
            black_box(ledger)
        })
    });

    group.bench_function("undo_redo_walk", |b| {
        let mut ledger = Ledger::new(0u32);
        for i in 1..=1000 {
            ledger.set(i);
        }
        b.iter(|| {
            while ledger.undo() {}
            while ledger.redo() {}
            black_box(*ledger.present())
        })
    });

    group.bench_function("debounced_typing", |b| {
        let t0 = Instant::now();
        b.iter(|| {
            let mut field = DebouncedField::new("");
            let mut text = String::new();
            for (i, ch) in "how does the borrow checker work".chars().enumerate() {
                text.push(ch);
                let now = t0 + Duration::from_millis(i as u64 * 120);
                field.edit(text.clone(), now);
                field.tick(now);
            }
            field.commit();
            black_box(field.ledger().past().len())
        })
    });

    group.finish();
}

/// Tab session operations
fn benchmark_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("open_update_close_100", |b| {
        b.iter(|| {
            let mut session = Session::new();
            for i in 0..100 {
                session.add_tab();
                session.update_active_tab_content(TabUpdate::new().title(format!("tab {}", i)));
            }
            while session.count() > 1 {
                session.remove_tab(session.active_tab_id());
            }
            black_box(session)
        })
    });

    group.bench_function("move_tab", |b| {
        let mut session = Session::new();
        for _ in 0..50 {
            session.add_tab();
        }
        b.iter(|| {
            session.move_tab(0, 49);
            session.move_tab(49, 0);
        })
    });

    group.finish();
}

/// Omnibox input handling
fn benchmark_omnibox(c: &mut Criterion) {
    let mut group = c.benchmark_group("omnibox");

    group.bench_function("classify", |b| {
        b.iter(|| {
            black_box(classify(black_box("what is the capital of australia")));
            black_box(classify(black_box("news.ycombinator.com")))
        })
    });

    group.bench_function("suggestions", |b| {
        b.iter(|| black_box(suggestions(black_box("how"))))
    });

    group.bench_function("parse_answer_text", |b| {
        let raw = format!(
            "{}\n\n### Related Searches\n* one\n* two\n* three\n",
            "Lorem ipsum dolor sit amet. ".repeat(200)
        );
        b.iter(|| black_box(parse_answer_text(black_box(&raw))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_ledger, benchmark_session, benchmark_omnibox);
criterion_main!(benches);
