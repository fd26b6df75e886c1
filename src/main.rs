use quadbench::control::Algorithm;
use quadbench::io::json::TrackingSummary;
use quadbench::io::{csv, json};
use quadbench::plant::Params;
use quadbench::reference::Pattern;
use quadbench::sim::{Simulator, DT};

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn main() {
    // -----------------------------------------------------------------------
    // Arguments: --algo pid|smc|sts|mpc  --pattern <id>  --wind <W>
    //            --duration <s>  --export
    // -----------------------------------------------------------------------
    let args: Vec<String> = std::env::args().collect();
    let value_of = |flag: &str| flag_value(&args, flag);

    let algorithm: Algorithm = match value_of("--algo").unwrap_or("pid").parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let pattern: Pattern = match value_of("--pattern").unwrap_or("circle").parse() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let wind: f64 = value_of("--wind").and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let duration: f64 = value_of("--duration").and_then(|v| v.parse().ok()).unwrap_or(20.0);
    let export = args.iter().any(|a| a == "--export");

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let params = Params::default();
    let mut sim = Simulator::new(params.clone()).expect("default parameters are valid");
    sim.set_algorithm(algorithm);
    if let Err(e) = sim.set_pattern(pattern) {
        eprintln!("{e}");
        std::process::exit(2);
    }
    if let Err(e) = sim.set_wind_intensity(wind) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let log = sim.run(duration);
    let summary = TrackingSummary::from_log(&log);

    // -----------------------------------------------------------------------
    // Export if requested
    // -----------------------------------------------------------------------
    if export {
        let csv_path = "flight_log.csv";
        let json_path = "tracking_summary.json";
        csv::write_log_file(csv_path, &log).expect("Failed to write CSV");
        json::write_summary_file(json_path, algorithm.as_str(), pattern.as_str(), &summary)
            .expect("Failed to write JSON");
        println!("Exported: {csv_path} and {json_path}");
    }

    // -----------------------------------------------------------------------
    // Print
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!(
        "  QUADROTOR CONTROLLER BENCH — {} on {}",
        algorithm.as_str().to_uppercase(),
        pattern.as_str()
    );
    println!("====================================================================");
    println!();
    println!(
        "  Vehicle: m={:.2} kg  I=[{:.4}, {:.4}, {:.4}]  L={:.2} m",
        params.mass, params.ixx, params.iyy, params.izz, params.arm_len
    );
    println!(
        "  Rotors: kT={:.3e}  kD={:.3e}  wmax={:.0} rad/s",
        params.k_thrust, params.k_drag, params.motor_max
    );
    println!("  Wind intensity: {wind:.1}   Timestep: {DT:.5} s (120 Hz)");
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>6}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}  {:>6}  {:>6}",
        "t(s)", "x(m)", "y(m)", "z(m)", "err(m)", "T(N)", "roll", "pitch"
    );
    println!("  {}", "─".repeat(66));

    let sample_interval = (log.len() / 30).max(1);
    for (i, rec) in log.iter().enumerate() {
        if i % sample_interval != 0 && i != log.len() - 1 {
            continue;
        }
        let s = &rec.state;
        let err = (s.pos - rec.setpoint.pos).norm();
        println!(
            "  {:>6.2}  {:>7.3}  {:>7.3}  {:>7.3}  {:>7.4}  {:>7.3}  {:>5.1}\u{00b0}  {:>5.1}\u{00b0}",
            s.time,
            s.pos.x,
            s.pos.y,
            s.pos.z,
            err,
            rec.input.thrust,
            s.att.x.to_degrees(),
            s.att.y.to_degrees(),
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------
    println!("  Tracking");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Mean error:   {:>8.4} m", summary.mean_err_m);
    println!("  RMS error:    {:>8.4} m", summary.rms_err_m);
    println!("  Max error:    {:>8.4} m", summary.max_err_m);
    println!("  Final error:  {:>8.4} m", summary.final_err_m);
    println!("  Mean thrust:  {:>8.3} N  (hover: {:.3} N)", summary.mean_thrust_n, params.hover_thrust());
    println!("  Motor saturation: {:>5.1}% of ticks", summary.saturated_fraction * 100.0);
    println!();
    println!("  Simulation: {} ticks, dt={DT:.5} s", log.len());
    if !export {
        println!("  Run with --export to save flight_log.csv and tracking_summary.json");
    }
    println!("====================================================================");
    println!();
}
