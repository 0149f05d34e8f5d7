//! Pile Solver Example - 40 m tubular pile, beam and Winkler analyses

use anyhow::Result;
use pile_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Pile Solver Example ===\n");

    let pile = Pile::create("Tube", 0.0, vec![PileSection::new(40.0, 2.0, 0.08)])?;

    // ------------------------------------------------------------------
    // Beam analysis: pile alone on two supports
    // ------------------------------------------------------------------
    //
    //   0 m   o  Tx, Ty fixed
    //         |
    // -15 m   |  Mz = -200 kNm
    // -20 m   |  Py = 200 kN
    // -25 m   |  Px = 100 kN
    // -30 m   o  Ty fixed
    //         |
    // -40 m   '
    let beam_model = PileModel::create(
        "Beam",
        pile.clone(),
        None,
        ModelConfig::default().with_coarseness(5.0),
    )?;

    let mut bc = beam_model.boundary_conditions();
    bc.set_support(0.0, Support::with_restraints(true, true, false))?;
    bc.set_support(-30.0, Support::with_restraints(false, true, false))?;
    bc.set_pointload(-15.0, PointLoad::mz(-200.0))?;
    bc.set_pointload(-20.0, PointLoad::py(200.0))?;
    bc.set_pointload(-25.0, PointLoad::px(100.0))?;

    for load in bc.point_loads() {
        println!("{}", load);
    }

    let beam = beam_model.analyze_beam(&bc)?;
    println!("\nReactions:");
    for r in &beam.reactions {
        println!(
            "  {:>7.2} m: Nr = {:>9.3} kN, Vr = {:>9.3} kN, Mr = {:>9.3} kNm",
            r.elevation, r.nr, r.vr, r.mr
        );
    }
    println!(
        "Max deflection {:.4e} m at {:.2} m, max moment {:.2} kNm at {:.2} m\n",
        beam.summary.max_deflection,
        beam.summary.max_deflection_elevation,
        beam.summary.max_moment,
        beam.summary.max_moment_elevation
    );

    // ------------------------------------------------------------------
    // Winkler analysis: same pile in sand over clay
    // ------------------------------------------------------------------
    let sand = ApiSand::new([35.0, 33.0], SandKind::Static)?;
    let clay = ApiClay::new([40.0, 80.0], [0.01, 0.005], ClayKind::Static)?;
    let soil = SoilProfile::create(
        "Borehole",
        0.0,
        0.0,
        vec![
            Layer::new("Medium dense sand", 0.0, -20.0, 20.0).with_lateral_model(sand.into()),
            Layer::new("Stiff clay", -20.0, -45.0, 19.0).with_lateral_model(clay.into()),
        ],
    )?;

    let soil_model = PileModel::create("Winkler", pile, Some(soil), ModelConfig::default())?;
    println!(
        "Winkler model: {} nodes, {} elements",
        soil_model.node_elevations().len(),
        soil_model.element_properties().len()
    );

    let mut bc = soil_model.boundary_conditions();
    bc.set_pointload(0.0, PointLoad::new(-1000.0, 2000.0, 10000.0))?;
    bc.set_support(-40.0, Support::with_restraints(true, false, false))?;

    let options = AnalysisOptions::default().with_logging();
    let winkler = soil_model.analyze_winkler(&bc, &options)?.ensure_converged()?;

    println!(
        "Converged in {} iterations, head deflection {:.4e} m",
        winkler.iterations,
        winkler.displacement_at(0.0).map(|d| d.deflection).unwrap_or_default()
    );

    println!("\n{}", winkler.to_json()?);

    Ok(())
}
