use std::io::{
    self,
    BufRead,
    Write,
};

use cihui::{
    core::CihuiError,
    library::{
        WordLibrary,
        LIBRARY_FILE,
    },
    persistence::get_data_file_path,
    review::{
        state::STATE_FILE,
        ReviewScheduler,
        WordAction,
    },
    WordRecord,
};

const REVIEW_BATCH_SIZE: usize = 5;

fn main() {
    env_logger::init();

    let library = WordLibrary::load(get_data_file_path(LIBRARY_FILE));
    let mut scheduler = ReviewScheduler::new(library, get_data_file_path(STATE_FILE));

    println!("cihui - vocabulary trainer");
    println!(
        "{} words in the library, {} learned",
        scheduler.library().len(),
        scheduler.learned_count()
    );

    let stdin = io::stdin();
    loop {
        println!("\n[l]earn  [r]eview  [a]dd word  [s]tats  [q]uit");
        let Some(choice) = prompt(&stdin, "> ") else { break };

        let result = match choice.as_str() {
            "l" => run_learning_session(&stdin, &mut scheduler),
            "r" => run_review_session(&stdin, &mut scheduler),
            "a" => add_word(&stdin, &mut scheduler),
            "s" => {
                show_stats(&scheduler);
                Ok(())
            }
            "q" => break,
            other => {
                println!("Unknown choice: {}", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("Error: {}", e);
        }
    }

    if let Err(e) = scheduler.persist() {
        eprintln!("Failed to save learning state: {}", e);
    }
}

fn run_learning_session(
    stdin: &io::Stdin,
    scheduler: &mut ReviewScheduler,
) -> Result<(), CihuiError> {
    if scheduler.is_session_complete() {
        let selected = scheduler.init_session();
        if selected.is_empty() {
            println!("No new words left to learn.");
            return Ok(());
        }
        println!("Starting a batch of {} new words.", selected.len());
    } else {
        println!("Continuing with {} words in the queue.", scheduler.current_queue().len());
    }

    while let Some(word_id) = scheduler.current_queue().first().cloned() {
        let word = match scheduler.lookup(&word_id) {
            Ok(word) => word,
            Err(e) => {
                // Drop the ghost id so the queue keeps draining
                println!("Skipping {}: {}", word_id, e);
                scheduler.submit_action(&word_id, WordAction::Discard)?;
                continue;
            }
        };

        println!("\n  {}", word.word);
        if prompt(stdin, "  reveal? [enter to show, s to stop] ").as_deref() == Some("s") {
            break;
        }
        show_word_details(&word);

        let action = loop {
            match prompt(stdin, "  [k]eep  [d]iscard  [r]elearn ").as_deref() {
                Some("k") => break WordAction::Keep,
                Some("d") => break WordAction::Discard,
                Some("r") => break WordAction::Relearn,
                None => return finish_session(scheduler),
                _ => println!("  Please answer k, d or r."),
            }
        };

        scheduler.submit_action(&word_id, action)?;
        scheduler.persist()?;
    }

    finish_session(scheduler)
}

fn finish_session(scheduler: &mut ReviewScheduler) -> Result<(), CihuiError> {
    scheduler.persist()?;
    if scheduler.is_session_complete() {
        println!("\nAll caught up for this batch.");
    }
    Ok(())
}

fn run_review_session(
    stdin: &io::Stdin,
    scheduler: &mut ReviewScheduler,
) -> Result<(), CihuiError> {
    let batch = scheduler.get_review_batch(REVIEW_BATCH_SIZE);
    if batch.is_empty() {
        println!("No learned words available for review yet.");
        return Ok(());
    }

    println!("\nReview these words:");
    for (i, word) in batch.iter().enumerate() {
        println!("  {}. {}", i + 1, word.word);
    }

    let reply = prompt(stdin, "\nNumbers of the words you forgot (empty if none): ")
        .unwrap_or_default();
    let forgotten: Vec<usize> = reply
        .split_whitespace()
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|n| (1..=batch.len()).contains(n))
        .map(|n| n - 1)
        .collect();

    let mut selected = Vec::new();
    let mut unselected = Vec::new();
    for (i, word) in batch.iter().enumerate() {
        if forgotten.contains(&i) {
            selected.push(word.id.clone());
        } else {
            unselected.push(word.id.clone());
        }
    }

    for word in &batch {
        show_word_details(word);
    }

    let outcome = scheduler.submit_selection(&selected, &unselected)?;
    scheduler.persist()?;
    println!(
        "{} queued for relearning, {} reinforced, {} skipped.",
        outcome.requeued.len(),
        outcome.reinforced.len(),
        outcome.skipped.len()
    );
    Ok(())
}

fn add_word(stdin: &io::Stdin, scheduler: &mut ReviewScheduler) -> Result<(), CihuiError> {
    let Some(word) = prompt(stdin, "word: ").filter(|s| !s.is_empty()) else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(translation) = prompt(stdin, "translation: ").filter(|s| !s.is_empty()) else {
        println!("Cancelled.");
        return Ok(());
    };
    let pronunciation = prompt(stdin, "pronunciation (optional): ").filter(|s| !s.is_empty());
    let example = prompt(stdin, "example (optional): ").filter(|s| !s.is_empty());
    let note = prompt(stdin, "note (optional): ").filter(|s| !s.is_empty());

    let record = WordRecord::new(word, translation, pronunciation, example, note);
    let added = scheduler.library_mut().add_words(vec![record])?;
    println!("Added {} word(s). Library now holds {}.", added, scheduler.library().len());
    Ok(())
}

fn show_word_details(word: &WordRecord) {
    println!("  {} - {}", word.word, word.translation);
    if let Some(pronunciation) = &word.pronunciation {
        println!("    pronunciation: {}", pronunciation);
    }
    if let Some(example) = &word.example {
        println!("    example: {}", example);
    }
    if let Some(note) = &word.note {
        println!("    note: {}", note);
    }
}

fn show_stats(scheduler: &ReviewScheduler) {
    let stats = scheduler.stats();
    println!("Session started: {}", stats.session_start_time.format("%Y-%m-%d %H:%M"));
    println!("  words seen:  {}", stats.session_words);
    println!("  kept:        {}", stats.session_kept);
    println!("  discarded:   {}", stats.session_discarded);
    println!("  learned:     {} total", scheduler.learned_count());
    println!("  queue:       {} pending", scheduler.current_queue().len());
}

fn prompt(stdin: &io::Stdin, label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
