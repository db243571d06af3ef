use toruslife::engine::RuleEngine;
use toruslife::pattern::PatternError;
use toruslife::pattern::PatternLibrary;
use toruslife::rle;
use toruslife::rule_set::RuleSet;

#[test]
fn test_patterns() -> anyhow::Result<()> {
    let pattern_dir = std::fs::read_dir("tests/rle_pats")?;
    let mut tested = 0;
    let mut failed = Vec::new();

    for entry in pattern_dir {
        let path = entry?.path();
        let bytes = std::fs::read(&path)?;

        match rle::read_pattern(&bytes, "fallback") {
            Ok(_) => tested += 1,
            Err(e) => failed.push((path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("Failed to parse {:?}: {:#}", path, err);
        }

        panic!(
            "{}/{} patterns failed to parse",
            failed.len(),
            tested + failed.len()
        );
    }

    assert!(tested > 0, "no RLE fixtures found");
    println!("Successfully parsed {} RLE patterns", tested);

    Ok(())
}

#[test]
fn gun_emits_a_glider() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/gosper_glider_gun.rle")?;
    let (pattern, header) = rle::read_pattern(&bytes, "gun")?;

    assert_eq!(pattern.name, "gosper_glider_gun");
    assert_eq!(header.author.as_deref(), Some("Bill Gosper"));

    let engine = RuleEngine::default();
    let start = pattern.place(128, 64)?;
    let mut grid = start.clone();
    for _ in 0..30 {
        grid = engine.next(&grid);
    }

    assert_eq!(start.count_live(), 36);
    assert_eq!(grid.count_live(), 41);
    assert!(start.iter_live().all(|(x, y)| grid.get(x, y) == Ok(true)));

    Ok(())
}

#[test]
fn pulsar_has_period_three() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/pulsar.rle")?;
    let (pattern, _) = rle::read_pattern(&bytes, "pulsar")?;

    let engine = RuleEngine::default();
    let start = pattern.place(32, 32)?;

    let first = engine.next(&start);
    assert_ne!(first, start);

    let third = engine.next(&engine.next(&first));
    assert_eq!(third, start);

    Ok(())
}

#[test]
fn name_falls_back_to_file_stem() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/r_pentomino.rle")?;
    let (pattern, header) = rle::read_pattern(&bytes, "R-pentomino")?;

    assert_eq!(header.name, None);
    assert_eq!(header.rule, None);
    assert_eq!(pattern.name, "r_pentomino");
    assert_eq!(pattern.label, "R-PENTOMINO");

    Ok(())
}

#[test]
fn rule_from_header() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/highlife_replicator.rle")?;
    let (pattern, header) = rle::read_pattern(&bytes, "replicator")?;

    let highlife: RuleSet = "B36/S23".parse()?;
    assert_eq!(header.rule, Some(highlife));
    assert_eq!(pattern.place(32, 32)?.count_live(), 12);

    Ok(())
}

#[test]
fn library_rejects_duplicate_names() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/glider.rle")?;
    let (pattern, _) = rle::read_pattern(&bytes, "glider")?;

    let mut library = PatternLibrary::default();
    assert!(matches!(
        library.insert(pattern.clone()),
        Err(PatternError::Duplicate { .. })
    ));

    let mut library = PatternLibrary::empty();
    library.insert(pattern)?;
    assert_eq!(library.names().collect::<Vec<_>>(), vec!["glider"]);

    Ok(())
}
