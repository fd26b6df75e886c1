use std::io::{self, Write};

use crate::sim::runner::TickRecord;

/// Write a tick log to CSV format.
///
/// Columns: time, x, y, z, vx, vy, vz, phi, theta, psi, p, q, r,
///          x_ref, y_ref, z_ref, T, tau_phi, tau_theta, tau_psi,
///          s_x, s_y, s_z, m1, m2, m3, m4, algo
pub fn write_log<W: Write>(writer: &mut W, log: &[TickRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "time,x,y,z,vx,vy,vz,phi,theta,psi,p,q,r,\
         x_ref,y_ref,z_ref,T,tau_phi,tau_theta,tau_psi,\
         s_x,s_y,s_z,m1,m2,m3,m4,algo"
    )?;

    for rec in log {
        let s = &rec.state;
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},{:.6},{:.8},{:.8},{:.8},\
             {:.6},{:.6},{:.6},{:.2},{:.2},{:.2},{:.2},{}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            s.att.x, s.att.y, s.att.z,
            s.rates.x, s.rates.y, s.rates.z,
            rec.setpoint.pos.x, rec.setpoint.pos.y, rec.setpoint.pos.z,
            rec.input.thrust,
            rec.input.torque.x, rec.input.torque.y, rec.input.torque.z,
            rec.surfaces.x, rec.surfaces.y, rec.surfaces.z,
            s.motors[0], s.motors[1], s.motors[2], s.motors[3],
            rec.algorithm.as_str(),
        )?;
    }

    Ok(())
}

/// Write a tick log to a CSV file at the given path.
pub fn write_log_file(path: &str, log: &[TickRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_log(&mut file, log)
}
