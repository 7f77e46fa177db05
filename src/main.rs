/// Command-line front end for the anesthetic ionization model and dose calculator
use anesthetic_sim::anesthetic::{AnestheticProfile, AnestheticRegistry};
use anesthetic_sim::animation::RandomWalk;
use anesthetic_sim::config::{ModelConfig, SWEEP_PH_MAX, SWEEP_PH_MIN};
use anesthetic_sim::dose::{compute_max_dose_by_label, DoseTables};
use anesthetic_sim::export::RenderSnapshot;
use anesthetic_sim::init_config::InitConfig;
use anesthetic_sim::ionization::{self, AnestheticReport, HENDERSON_HASSELBALCH};
use anesthetic_sim::stage::{MechanismStage, MolecularForm, Site, StageNarrator, VisualElement};
use std::env;
use std::error::Error;

struct Context {
    registry: AnestheticRegistry,
    model: ModelConfig,
}

impl Context {
    fn load(config_path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let init = match config_path {
            Some(path) => {
                let init = InitConfig::load_from_file(path)?;
                println!("✓ Loaded configuration: {}", path);
                init
            }
            None => InitConfig::load_default()?,
        };
        Ok(Self {
            registry: init.registry()?,
            model: init.model_config()?,
        })
    }

    fn drug(&self, name: &str) -> Result<&AnestheticProfile, Box<dyn Error>> {
        Ok(self.registry.lookup(name)?)
    }
}

fn main() {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = args.remove(i + 1);
            args.remove(i);
            Some(path)
        }
        Some(_) => {
            println!("❌ Error: --config needs a file name");
            return;
        }
        None => None,
    };

    if args.is_empty() {
        print_usage();
        return;
    }

    let ctx = match Context::load(config_path.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let command = args[0].as_str();
    let rest = &args[1..];
    let result = match command {
        "list" => list_anesthetics(&ctx),
        "info" => show_info(&ctx, rest),
        "stage" => show_stage(&ctx, rest),
        "sweep" => run_sweep(&ctx, rest),
        "dose" => run_dose(rest),
        "animate" => run_animation(&ctx, rest),
        _ => {
            println!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "profiling")]
    anesthetic_sim::PROFILER.lock().log_and_clear();
}

fn print_usage() {
    println!("\n╔══════════════════════════════════════════════════════════╗");
    println!("║  Anesthetic Sim - Ionization & Dose Limit Tool           ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");
    println!("Usage: cargo run --release -- [--config <file.toml>] <command> [options]\n");
    println!("Commands:");
    println!("  list                                   List registered anesthetics");
    println!("  info <drug> [pH]                       Ionization report for one drug");
    println!("  stage <drug> <1-5> [--json] [--out <file>]");
    println!("                                         Describe a mechanism stage");
    println!("  sweep <drug> <ph_min> <ph_max> <step>  Base percent across a pH range");
    println!("  dose <salt> <conc> <kg> [<vaso> <asa>] Maximum dose and cartridges");
    println!("  animate <drug> <frames> [seed]         Run the decorative random walk\n");
    println!("Examples:");
    println!("  cargo run --release -- info lidocaina 6.5");
    println!("  cargo run --release -- stage bupivacaina 5 --out snapshot.json");
    println!("  cargo run --release -- dose bupivacaina 0.5% 70 \"1:200000 epinefrina\" \"ASA III/IV\"\n");
}

fn parse_num<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, Box<dyn Error>> {
    value
        .trim()
        .replace(',', ".")
        .parse::<T>()
        .map_err(|_| format!("invalid {}: {}", what, value).into())
}

fn list_anesthetics(ctx: &Context) -> Result<(), Box<dyn Error>> {
    println!("\n📋 {} anesthetics registered\n", ctx.registry.len());
    println!("  {:<14} {:<12} {:>5} {:>8} {:>10}", "Name", "Class", "pKa", "% RN", "Onset");
    for p in ctx.registry.iter() {
        println!(
            "  {:<14} {:<12} {:>5.1} {:>7.0}% {:>10}",
            p.name,
            p.class.label(),
            p.pka,
            p.tabulated_base_percent,
            p.onset.to_string()
        );
    }
    println!();
    Ok(())
}

fn show_info(ctx: &Context, args: &[String]) -> Result<(), Box<dyn Error>> {
    let Some(name) = args.first() else {
        return Err("usage: info <drug> [pH]".into());
    };
    let profile = ctx.drug(name)?;
    let ph = match args.get(1) {
        Some(v) => parse_num::<f64>(v, "pH")?,
        None => ctx.model.extracellular_ph,
    };
    let report = AnestheticReport::new(profile, ph);

    println!("\n🧪 {} ({})", report.name, report.class);
    println!("  pKa:               {}", profile.pka);
    println!("  pH:                {}", ph);
    println!("  Base (RN):         {:.1}%", report.ionization.base_percent);
    println!("  Ionized (RNH⁺):    {:.1}%", report.ionization.ionized_percent);
    println!("  Tabulated RN:      {:.0}% ({:+.1} pts)", report.tabulated_base_percent, report.tabulated_discrepancy);
    println!("  Onset:             {}", report.onset);
    println!("  {}\n", HENDERSON_HASSELBALCH);
    Ok(())
}

fn show_stage(ctx: &Context, args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() < 2 {
        return Err("usage: stage <drug> <1-5> [--json] [--out <file>]".into());
    }
    let profile = ctx.drug(&args[0])?;
    let index: i64 = parse_num(&args[1], "stage")?;
    let stage = MechanismStage::clamped(index);
    if stage.index() as i64 != index {
        println!("⚠️  Stage {} clamped to {}", index, stage.index());
    }

    let snapshot = RenderSnapshot::new(profile, stage, &ctx.model);
    if let Some(i) = args.iter().position(|a| a == "--out") {
        let path = args.get(i + 1).ok_or("--out needs a file name")?;
        snapshot.write_json(path)?;
        println!("✅ Snapshot written: {}", path);
    }
    if args.iter().any(|a| a == "--json") {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    let d = &snapshot.stage;
    println!("\n🔬 {} - stage {}: {}", d.anesthetic, stage.index(), stage.title());
    for (label, c) in [
        ("Extracellular", &d.equilibrium.extracellular),
        ("Intracellular", &d.equilibrium.intracellular),
    ] {
        println!(
            "  {:<14} pH {:.1}: {} RN / {} RNH⁺ of {}",
            label, c.ph, c.base_count, c.ionized_count, c.total_particles
        );
    }
    println!("  Particles shown:");
    for site in [Site::Extracellular, Site::Intracellular, Site::ChannelSite] {
        println!(
            "    {:?}: {} {} / {} {}",
            site,
            d.count(MolecularForm::Base, site),
            MolecularForm::Base.label(),
            d.count(MolecularForm::Ionized, site),
            MolecularForm::Ionized.label()
        );
    }
    println!("  In transit:        {}", d.in_transit());
    println!("  Channel blocked:   {}", if d.channel_blocked() { "yes" } else { "no" });
    for e in &d.elements {
        if let VisualElement::Caption { stage, text } = e {
            println!("  [{}] {}", stage.index(), text);
        }
    }
    println!();
    Ok(())
}

fn run_sweep(ctx: &Context, args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() < 4 {
        return Err("usage: sweep <drug> <ph_min> <ph_max> <step>".into());
    }
    let profile = ctx.drug(&args[0])?;
    let min: f64 = parse_num(&args[1], "ph_min")?;
    let max: f64 = parse_num(&args[2], "ph_max")?;
    let step: f64 = parse_num(&args[3], "step")?;
    if min < SWEEP_PH_MIN || max > SWEEP_PH_MAX {
        return Err(format!("pH range must stay within {}..{}", SWEEP_PH_MIN, SWEEP_PH_MAX).into());
    }

    let rows = ionization::sweep(profile.pka, min, max, step);
    if rows.is_empty() {
        return Err(format!("empty pH range {}..{} step {}", min, max, step).into());
    }
    println!("\n📈 {} (pKa {})", profile.name, profile.pka);
    println!("  {:>5} {:>8} {:>8}", "pH", "% RN", "% RNH⁺");
    for r in rows {
        println!("  {:>5.2} {:>7.2}% {:>7.2}%", r.ph, r.base_percent, r.ionized_percent);
    }
    println!();
    Ok(())
}

fn run_dose(args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() != 3 && args.len() != 5 {
        return Err("usage: dose <salt> <concentration> <weight_kg> [<vasoconstrictor> <asa>]".into());
    }
    let weight: f64 = parse_num(&args[2], "weight")?;
    let (vaso, asa) = match args.len() {
        5 => (Some(args[3].as_str()), Some(args[4].as_str())),
        _ => (None, None),
    };
    let r = compute_max_dose_by_label(DoseTables::builtin(), &args[0], &args[1], weight, vaso, asa)?;

    println!("\n💉 {} {}", r.salt.label(), r.concentration);
    if r.effective_weight_kg < weight {
        println!("⚠️  Weight capped at {} kg", r.effective_weight_kg);
    }
    println!("  Max dose:          {:.1} mg", r.max_dose_mg);
    println!("  Volume:            {:.2} mL", r.volume_ml);
    println!("  Cartridges (dose): {}", r.dose_limited_cartridges);
    if let Some(ceiling) = r.vasoconstrictor_ceiling {
        println!("  Vaso ceiling:      {}", ceiling);
    }
    println!("  Max cartridges:    {}", r.max_cartridges);
    println!("\n  {}", r.drug_note);
    println!("  {}\n", r.vasoconstrictor_note);
    Ok(())
}

fn run_animation(ctx: &Context, args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() < 2 {
        return Err("usage: animate <drug> <frames> [seed]".into());
    }
    let profile = ctx.drug(&args[0])?;
    let frames: usize = parse_num(&args[1], "frames")?;
    let seed = args.get(2).map(|s| parse_num::<u64>(s, "seed")).transpose()?;

    let initial = StageNarrator::new(&ctx.model).describe(profile, MechanismStage::InitialDistribution);
    let mut walk = RandomWalk::new(&initial, seed)?;
    println!("\n🎞️  {} random walk, {} frames", profile.name, frames);
    println!("  {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}", "frame", "out RNH⁺", "out RN", "crossing", "in RN", "in RNH⁺");
    let every = (frames / 20).max(1);
    for f in walk.run(frames) {
        if f.frame as usize % every == 0 || f.frame as usize == frames {
            println!(
                "  {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
                f.frame,
                f.extracellular_ionized.len(),
                f.extracellular_base.len(),
                f.crossing.len(),
                f.intracellular_base.len(),
                f.intracellular_ionized.len()
            );
        }
    }
    println!();
    Ok(())
}
